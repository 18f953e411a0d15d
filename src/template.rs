// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Template construction conveniences.
//!
//! Canned templates for the common pass categories, pre-populated with the
//! fields each category typically shows. Callers can always build a
//! [PassTemplate] by hand instead.

use {
    crate::model::{
        BarcodeFormat, FieldRegion, PassField, PassImages, PassStructure, PassStyle,
        PassTemplate, PassType, Platform,
    },
    uuid::Uuid,
};

impl PassTemplate {
    /// Create a template with a generated id and default styling.
    pub fn new(
        name: impl ToString,
        organization_id: impl ToString,
        pass_type: PassType,
    ) -> Self {
        let name = name.to_string();

        Self {
            id: Uuid::new_v4().to_string(),
            description: format!("{} Pass", name),
            organization_id: organization_id.to_string(),
            pass_type,
            structure: PassStructure::default(),
            style: PassStyle {
                background_color: Some("#FFFFFF".to_string()),
                foreground_color: Some("#000000".to_string()),
                label_color: Some("#999999".to_string()),
                logo_text: Some(name.clone()),
            },
            images: PassImages::default(),
            locations: vec![],
            nfc: None,
            barcode_format: BarcodeFormat::default(),
            authentication_token: None,
            web_service_url: None,
            is_active: true,
            name,
        }
    }

    /// Append a field to one of the template's display regions.
    pub fn add_field(&mut self, region: FieldRegion, field: PassField) -> &mut Self {
        self.structure.fields_mut(region).push(field);
        self
    }
}

fn pass_type_for(platform: Platform, apple: PassType, google: PassType, samsung: PassType) -> PassType {
    match platform {
        Platform::Apple => apple,
        Platform::Google => google,
        Platform::Samsung => samsung,
    }
}

/// Template for event tickets.
pub fn event_ticket_template(
    name: impl ToString,
    organization_id: impl ToString,
    platform: Platform,
) -> PassTemplate {
    let name = name.to_string();
    let mut template = PassTemplate::new(
        name.clone(),
        organization_id,
        pass_type_for(
            platform,
            PassType::AppleEventTicket,
            PassType::GoogleEventTicket,
            PassType::SamsungTicket,
        ),
    );
    template.description = format!("{} Event Ticket", name);

    template
        .add_field(FieldRegion::Header, PassField::new("event_name", "Event", name))
        .add_field(FieldRegion::Primary, PassField::placeholder("event_date", "Date"))
        .add_field(
            FieldRegion::Secondary,
            PassField::placeholder("event_location", "Location"),
        )
        .add_field(
            FieldRegion::Auxiliary,
            PassField::new("ticket_type", "Ticket Type", "General Admission"),
        )
        .add_field(FieldRegion::Back, PassField::placeholder("event_details", "Details"));

    template
}

/// Template for coupons and offers.
pub fn coupon_template(
    name: impl ToString,
    organization_id: impl ToString,
    platform: Platform,
) -> PassTemplate {
    let name = name.to_string();
    let mut template = PassTemplate::new(
        name.clone(),
        organization_id,
        pass_type_for(
            platform,
            PassType::AppleCoupon,
            PassType::GoogleOffer,
            PassType::SamsungCoupon,
        ),
    );
    template.description = format!("{} Coupon", name);

    template
        .add_field(FieldRegion::Primary, PassField::new("offer", "Offer", name))
        .add_field(FieldRegion::Secondary, PassField::placeholder("expiration", "Expires"))
        .add_field(
            FieldRegion::Auxiliary,
            PassField::placeholder("promo_code", "Promo Code"),
        )
        .add_field(
            FieldRegion::Back,
            PassField::placeholder("terms", "Terms & Conditions"),
        );

    template
}

/// Template for loyalty and membership cards.
pub fn loyalty_template(
    name: impl ToString,
    organization_id: impl ToString,
    platform: Platform,
) -> PassTemplate {
    let name = name.to_string();
    let mut template = PassTemplate::new(
        name.clone(),
        organization_id,
        pass_type_for(
            platform,
            PassType::AppleStoreCard,
            PassType::GoogleLoyalty,
            PassType::SamsungMembership,
        ),
    );
    template.description = format!("{} Loyalty Card", name);

    template
        .add_field(FieldRegion::Header, PassField::placeholder("member_name", "Member"))
        .add_field(FieldRegion::Primary, PassField::new("points", "Points", "0"))
        .add_field(
            FieldRegion::Secondary,
            PassField::placeholder("member_since", "Member Since"),
        )
        .add_field(
            FieldRegion::Auxiliary,
            PassField::new("membership_level", "Level", "Standard"),
        )
        .add_field(
            FieldRegion::Back,
            PassField::placeholder("program_details", "Program Details"),
        );

    template
}

/// Template for boarding passes.
pub fn boarding_pass_template(
    name: impl ToString,
    organization_id: impl ToString,
    platform: Platform,
) -> PassTemplate {
    let name = name.to_string();
    let mut template = PassTemplate::new(
        name.clone(),
        organization_id,
        pass_type_for(
            platform,
            PassType::AppleBoardingPass,
            PassType::GoogleFlight,
            PassType::SamsungBoarding,
        ),
    );
    template.description = format!("{} Boarding Pass", name);

    template
        .add_field(
            FieldRegion::Header,
            PassField::placeholder("passenger_name", "Passenger"),
        )
        .add_field(FieldRegion::Primary, PassField::placeholder("flight_number", "Flight"))
        .add_field(FieldRegion::Primary, PassField::placeholder("date", "Date"))
        .add_field(FieldRegion::Secondary, PassField::placeholder("from", "From"))
        .add_field(FieldRegion::Secondary, PassField::placeholder("to", "To"))
        .add_field(
            FieldRegion::Auxiliary,
            PassField::placeholder("boarding_time", "Boarding"),
        )
        .add_field(FieldRegion::Auxiliary, PassField::placeholder("seat", "Seat"))
        .add_field(
            FieldRegion::Back,
            PassField::placeholder("flight_details", "Flight Details"),
        );

    template
}
