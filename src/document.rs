// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apple pass document generation.
//!
//! Maps a [PassTemplate] plus [PassData] into the `pass.json` key/value
//! document that Apple Wallet consumes. Document keys are mandated by the
//! platform's validator and are emitted verbatim; a misspelled key results in
//! the pass being silently rejected on import.

use {
    crate::{
        config::AppleConfig,
        error::WalletPassError,
        model::{FieldRegion, PassData, PassField, PassTemplate, Platform},
    },
    chrono::SecondsFormat,
    serde_json::{json, Map, Value},
};

/// Generate the pass document for a template and pass instance data.
///
/// Instance field values override template defaults by key; template fields
/// with neither a default nor an override are omitted entirely. Organization
/// identity always comes from the template. `createdAt`/`updatedAt` are
/// lifecycle state owned by the provider and are not set here.
pub fn generate_document(
    config: &AppleConfig,
    template: &PassTemplate,
    data: &PassData,
    serial_number: &str,
) -> Result<Map<String, Value>, WalletPassError> {
    validate_template(template)?;

    let style_key = template.pass_type.apple_style_key().ok_or_else(|| {
        WalletPassError::Validation(format!(
            "pass type {:?} is not an Apple pass type",
            template.pass_type
        ))
    })?;

    let mut doc = Map::new();

    // Standard pass headers.
    doc.insert("formatVersion".to_string(), json!(1));
    doc.insert(
        "passTypeIdentifier".to_string(),
        json!(config.pass_type_identifier),
    );
    doc.insert("serialNumber".to_string(), json!(serial_number));
    doc.insert("teamIdentifier".to_string(), json!(config.team_identifier));
    doc.insert(
        "organizationName".to_string(),
        json!(config.organization_name),
    );

    // SDK metadata, ignored by Apple but used for pass lifecycle management.
    doc.insert("templateId".to_string(), json!(template.id));
    doc.insert("customerId".to_string(), json!(data.customer_id));
    doc.insert("organizationId".to_string(), json!(template.organization_id));

    let description = if template.description.is_empty() {
        format!("{} Pass", template.name)
    } else {
        template.description.clone()
    };
    doc.insert("description".to_string(), json!(description));

    if let Some(text) = &template.style.logo_text {
        doc.insert("logoText".to_string(), json!(text));
    }
    if let Some(color) = &template.style.background_color {
        doc.insert("backgroundColor".to_string(), json!(color));
    }
    if let Some(color) = &template.style.foreground_color {
        doc.insert("foregroundColor".to_string(), json!(color));
    }
    if let Some(color) = &template.style.label_color {
        doc.insert("labelColor".to_string(), json!(color));
    }

    if let Some(date) = &data.expiration_date {
        doc.insert(
            "expirationDate".to_string(),
            json!(date.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }
    if let Some(date) = &data.relevant_date {
        doc.insert(
            "relevantDate".to_string(),
            json!(date.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }

    if data.voided {
        doc.insert("voided".to_string(), json!(true));
    }

    if let Some(message) = &data.barcode_message {
        // The symbology comes from the template's configured format, never
        // re-derived from the message content.
        let mut barcode = Map::new();
        barcode.insert(
            "format".to_string(),
            json!(template.barcode_format.apple_format()),
        );
        barcode.insert("message".to_string(), json!(message));
        barcode.insert("messageEncoding".to_string(), json!("iso-8859-1"));

        if let Some(alt_text) = &data.barcode_alt_text {
            barcode.insert("altText".to_string(), json!(alt_text));
        }

        doc.insert("barcodes".to_string(), json!([barcode]));
        // Pre-iOS 9 readers only understand the singular key.
        doc.insert("barcode".to_string(), Value::Object(barcode));
    }

    if let Some(token) = &template.authentication_token {
        doc.insert("authenticationToken".to_string(), json!(token));
    }

    if let Some(url) = template
        .web_service_url
        .as_ref()
        .or(config.web_service_url.as_ref())
    {
        doc.insert("webServiceURL".to_string(), json!(url));
    }

    if !template.locations.is_empty() {
        let locations = template
            .locations
            .iter()
            .map(|location| {
                let mut entry = Map::new();
                entry.insert("latitude".to_string(), json!(location.latitude));
                entry.insert("longitude".to_string(), json!(location.longitude));
                if let Some(altitude) = location.altitude {
                    entry.insert("altitude".to_string(), json!(altitude));
                }
                if let Some(text) = &location.relevant_text {
                    entry.insert("relevantText".to_string(), json!(text));
                }
                Value::Object(entry)
            })
            .collect::<Vec<_>>();

        doc.insert("locations".to_string(), json!(locations));
    }

    if let Some(nfc) = &template.nfc {
        let mut entry = Map::new();
        entry.insert("message".to_string(), json!(nfc.message));
        if let Some(key) = &nfc.encryption_public_key {
            entry.insert("encryptionPublicKey".to_string(), json!(key));
        }
        entry.insert(
            "requiresAuthentication".to_string(),
            json!(nfc.requires_authentication),
        );

        doc.insert("nfc".to_string(), Value::Object(entry));
    }

    // Field layout, nested under the style key for the pass type.
    let mut regions = Map::new();

    for region in FieldRegion::all() {
        let fields = template.structure.fields(region);
        if fields.is_empty() {
            continue;
        }

        let rendered = fields
            .iter()
            .filter_map(|field| render_field(field, data))
            .collect::<Vec<_>>();

        if !rendered.is_empty() {
            regions.insert(region.apple_key().to_string(), json!(rendered));
        }
    }

    doc.insert(style_key.to_string(), Value::Object(regions));

    Ok(doc)
}

fn validate_template(template: &PassTemplate) -> Result<(), WalletPassError> {
    let mut missing = vec![];

    if template.id.is_empty() {
        missing.push("id");
    }
    if template.organization_id.is_empty() {
        missing.push("organization_id");
    }

    if !missing.is_empty() {
        return Err(WalletPassError::Validation(format!(
            "template is missing required fields: {}",
            missing.join(", ")
        )));
    }

    if template.pass_type.platform() != Platform::Apple {
        return Err(WalletPassError::Validation(format!(
            "pass type {:?} targets {} and cannot be rendered as an Apple pass document",
            template.pass_type,
            template.pass_type.platform()
        )));
    }

    Ok(())
}

/// Render one field, applying the instance override for its key if present.
///
/// Returns `None` when the field has no resolvable value, in which case it is
/// left out of the document rather than emitted empty.
fn render_field(field: &PassField, data: &PassData) -> Option<Value> {
    let value = data
        .field_values
        .get(&field.key)
        .or(field.value.as_ref())?;

    let mut entry = Map::new();
    entry.insert("key".to_string(), json!(field.key));
    entry.insert("label".to_string(), json!(field.label));
    entry.insert("value".to_string(), json!(value));

    if let Some(message) = &field.change_message {
        entry.insert("changeMessage".to_string(), json!(message));
    }
    if let Some(alignment) = &field.text_alignment {
        entry.insert("textAlignment".to_string(), json!(alignment));
    }
    if let Some(style) = &field.date_style {
        entry.insert("dateStyle".to_string(), json!(style));
    }
    if let Some(style) = &field.time_style {
        entry.insert("timeStyle".to_string(), json!(style));
    }
    if field.is_relative {
        entry.insert("isRelative".to_string(), json!(true));
    }
    if let Some(code) = &field.currency_code {
        entry.insert("currencyCode".to_string(), json!(code));
    }
    if let Some(format) = &field.number_format {
        entry.insert("numberFormat".to_string(), json!(format));
    }

    Some(Value::Object(entry))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::model::{BarcodeFormat, FieldValue, Location, NfcPayload, PassType},
        chrono::{TimeZone, Utc},
    };

    fn config() -> AppleConfig {
        AppleConfig {
            pass_type_identifier: "pass.com.example.test".to_string(),
            team_identifier: "ABCDE12345".to_string(),
            organization_name: "Test Organization".to_string(),
            certificate_path: "/unused".into(),
            private_key_path: "/unused".into(),
            wwdr_certificate_path: "/unused".into(),
            web_service_url: None,
        }
    }

    fn template() -> PassTemplate {
        let mut template = crate::template::event_ticket_template(
            "Gig",
            "org-1",
            Platform::Apple,
        );
        template.id = "template-1".to_string();
        template
    }

    fn data() -> PassData {
        PassData::new("template-1", "customer-1")
    }

    #[test]
    fn instance_values_override_template_defaults() {
        let mut data = data();
        data.field_values
            .insert("event_name".to_string(), FieldValue::Text("Sold Out Gig".into()));

        let doc = generate_document(&config(), &template(), &data, "serial-1").unwrap();

        let header = &doc["eventTicket"]["headerFields"][0];
        assert_eq!(header["key"], "event_name");
        assert_eq!(header["value"], "Sold Out Gig");
    }

    #[test]
    fn template_defaults_survive_without_overrides() {
        let doc = generate_document(&config(), &template(), &data(), "serial-1").unwrap();

        assert_eq!(doc["eventTicket"]["headerFields"][0]["value"], "Gig");
    }

    #[test]
    fn unresolved_fields_are_omitted() {
        // The event ticket template's non-header fields are placeholders with
        // no default value; with no overrides they must not appear at all.
        let doc = generate_document(&config(), &template(), &data(), "serial-1").unwrap();

        let style = doc["eventTicket"].as_object().unwrap();
        assert!(style.contains_key("headerFields"));
        assert!(!style.contains_key("primaryFields"));
        assert!(!style.contains_key("secondaryFields"));
    }

    #[test]
    fn standard_headers_are_present() {
        let doc = generate_document(&config(), &template(), &data(), "serial-1").unwrap();

        assert_eq!(doc["formatVersion"], 1);
        assert_eq!(doc["passTypeIdentifier"], "pass.com.example.test");
        assert_eq!(doc["serialNumber"], "serial-1");
        assert_eq!(doc["teamIdentifier"], "ABCDE12345");
        assert_eq!(doc["organizationName"], "Test Organization");
        assert_eq!(doc["organizationId"], "org-1");
    }

    #[test]
    fn unset_style_attributes_are_omitted_not_null() {
        let mut template = template();
        template.style.background_color = None;
        template.style.label_color = None;

        let doc = generate_document(&config(), &template, &data(), "serial-1").unwrap();

        assert!(!doc.contains_key("backgroundColor"));
        assert!(!doc.contains_key("labelColor"));
        assert!(doc.contains_key("foregroundColor"));
    }

    #[test]
    fn barcode_format_comes_from_template() {
        let mut template = template();
        template.barcode_format = BarcodeFormat::Pdf417;

        let mut data = data();
        data.barcode_message = Some("TICKET-123".to_string());
        data.barcode_alt_text = Some("123".to_string());

        let doc = generate_document(&config(), &template, &data, "serial-1").unwrap();

        assert_eq!(doc["barcodes"][0]["format"], "PKBarcodeFormatPDF417");
        assert_eq!(doc["barcodes"][0]["message"], "TICKET-123");
        assert_eq!(doc["barcodes"][0]["altText"], "123");
        assert_eq!(doc["barcode"]["format"], "PKBarcodeFormatPDF417");
    }

    #[test]
    fn no_barcode_block_without_message() {
        let doc = generate_document(&config(), &template(), &data(), "serial-1").unwrap();

        assert!(!doc.contains_key("barcodes"));
        assert!(!doc.contains_key("barcode"));
    }

    #[test]
    fn timestamps_are_iso8601() {
        let mut data = data();
        data.expiration_date = Some(Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap());

        let doc = generate_document(&config(), &template(), &data, "serial-1").unwrap();

        assert_eq!(doc["expirationDate"], "2026-12-31T23:59:59Z");
    }

    #[test]
    fn voided_flag_only_emitted_when_set() {
        let doc = generate_document(&config(), &template(), &data(), "serial-1").unwrap();
        assert!(!doc.contains_key("voided"));

        let mut data = data();
        data.voided = true;
        let doc = generate_document(&config(), &template(), &data, "serial-1").unwrap();
        assert_eq!(doc["voided"], true);
    }

    #[test]
    fn locations_and_nfc_blocks() {
        let mut template = template();
        template.locations.push(Location {
            relevant_text: Some("Venue entrance".to_string()),
            ..Location::new(37.33, -122.01)
        });
        template.nfc = Some(NfcPayload {
            message: "tap".to_string(),
            encryption_public_key: None,
            requires_authentication: true,
        });

        let doc = generate_document(&config(), &template, &data(), "serial-1").unwrap();

        assert_eq!(doc["locations"][0]["latitude"], 37.33);
        assert_eq!(doc["locations"][0]["relevantText"], "Venue entrance");
        assert_eq!(doc["nfc"]["message"], "tap");
        assert_eq!(doc["nfc"]["requiresAuthentication"], true);
    }

    #[test]
    fn template_web_service_url_wins_over_config() {
        let mut config = config();
        config.web_service_url = Some("https://config.example.com".to_string());

        let mut template = template();
        template.web_service_url = Some("https://template.example.com".to_string());

        let doc = generate_document(&config, &template, &data(), "serial-1").unwrap();
        assert_eq!(doc["webServiceURL"], "https://template.example.com");

        template.web_service_url = None;
        let doc = generate_document(&config, &template, &data(), "serial-1").unwrap();
        assert_eq!(doc["webServiceURL"], "https://config.example.com");
    }

    #[test]
    fn missing_required_template_fields_fail_validation() {
        let mut template = template();
        template.id = String::new();
        template.organization_id = String::new();

        let err = generate_document(&config(), &template, &data(), "serial-1").unwrap_err();

        assert!(matches!(err, WalletPassError::Validation(_)));
        let message = err.to_string();
        assert!(message.contains("id"));
        assert!(message.contains("organization_id"));
    }

    #[test]
    fn non_apple_pass_type_fails_validation() {
        let mut template = template();
        template.pass_type = PassType::GoogleEventTicket;

        assert!(matches!(
            generate_document(&config(), &template, &data(), "serial-1"),
            Err(WalletPassError::Validation(_))
        ));
    }
}
