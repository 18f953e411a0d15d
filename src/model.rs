// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema types for wallet pass templates and pass instance data.

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        fmt::{Display, Formatter},
    },
};

/// Wallet platform a pass targets.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Apple,
    Google,
    Samsung,
}

impl Platform {
    /// Stable lowercase name, used as the storage namespace for providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Google => "google",
            Self::Samsung => "samsung",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed enumeration of supported pass types.
///
/// Each variant pairs a wallet platform with a pass subtype. The variant
/// determines both which provider handles the pass and, for Apple passes,
/// which style sub-key the pass document is emitted under.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum PassType {
    AppleGeneric,
    AppleEventTicket,
    AppleCoupon,
    AppleStoreCard,
    AppleBoardingPass,
    GoogleOffer,
    GoogleEventTicket,
    GoogleLoyalty,
    GoogleGiftCard,
    GoogleFlight,
    GoogleTransit,
    SamsungCoupon,
    SamsungMembership,
    SamsungTicket,
    SamsungBoarding,
}

impl PassType {
    pub fn platform(&self) -> Platform {
        match self {
            Self::AppleGeneric
            | Self::AppleEventTicket
            | Self::AppleCoupon
            | Self::AppleStoreCard
            | Self::AppleBoardingPass => Platform::Apple,
            Self::GoogleOffer
            | Self::GoogleEventTicket
            | Self::GoogleLoyalty
            | Self::GoogleGiftCard
            | Self::GoogleFlight
            | Self::GoogleTransit => Platform::Google,
            Self::SamsungCoupon
            | Self::SamsungMembership
            | Self::SamsungTicket
            | Self::SamsungBoarding => Platform::Samsung,
        }
    }

    /// The camelCase style key under which an Apple pass document nests its
    /// field layout (`eventTicket`, `storeCard`, ...).
    ///
    /// Apple's validator matches these keys verbatim, so they are spelled out
    /// here rather than derived from the variant name.
    pub fn apple_style_key(&self) -> Option<&'static str> {
        match self {
            Self::AppleGeneric => Some("generic"),
            Self::AppleEventTicket => Some("eventTicket"),
            Self::AppleCoupon => Some("coupon"),
            Self::AppleStoreCard => Some("storeCard"),
            Self::AppleBoardingPass => Some("boardingPass"),
            _ => None,
        }
    }
}

/// Barcode symbology for a pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[default]
    Qr,
    Pdf417,
    Aztec,
    Code128,
}

impl BarcodeFormat {
    /// The PassKit format identifier emitted in Apple pass documents.
    pub fn apple_format(&self) -> &'static str {
        match self {
            Self::Qr => "PKBarcodeFormatQR",
            Self::Pdf417 => "PKBarcodeFormatPDF417",
            Self::Aztec => "PKBarcodeFormatAztec",
            Self::Code128 => "PKBarcodeFormatCode128",
        }
    }
}

/// Value carried by a pass field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

/// A single labeled field on a pass.
///
/// Key uniqueness within a display region is the caller's responsibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassField {
    pub key: String,
    pub label: String,
    /// Default value from the template. `None` means the field has no value
    /// until pass instance data supplies one; unresolved fields are omitted
    /// from generated documents entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_relative: bool,
}

impl PassField {
    pub fn new(
        key: impl ToString,
        label: impl ToString,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: Some(value.into()),
            change_message: None,
            text_alignment: None,
            date_style: None,
            time_style: None,
            currency_code: None,
            number_format: None,
            is_relative: false,
        }
    }

    /// A field with no default value. It only appears in generated documents
    /// when pass instance data provides a value for its key.
    pub fn placeholder(key: impl ToString, label: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: None,
            change_message: None,
            text_alignment: None,
            date_style: None,
            time_style: None,
            currency_code: None,
            number_format: None,
            is_relative: false,
        }
    }

    pub fn change_message(mut self, message: impl ToString) -> Self {
        self.change_message = Some(message.to_string());
        self
    }
}

/// Display regions a pass field can be placed in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRegion {
    Header,
    Primary,
    Secondary,
    Auxiliary,
    Back,
}

impl FieldRegion {
    pub fn all() -> [Self; 5] {
        [
            Self::Header,
            Self::Primary,
            Self::Secondary,
            Self::Auxiliary,
            Self::Back,
        ]
    }

    /// Document key for this region's field array in Apple pass documents.
    pub fn apple_key(&self) -> &'static str {
        match self {
            Self::Header => "headerFields",
            Self::Primary => "primaryFields",
            Self::Secondary => "secondaryFields",
            Self::Auxiliary => "auxiliaryFields",
            Self::Back => "backFields",
        }
    }
}

/// Ordered field lists per display region.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PassStructure {
    #[serde(default)]
    pub header_fields: Vec<PassField>,
    #[serde(default)]
    pub primary_fields: Vec<PassField>,
    #[serde(default)]
    pub secondary_fields: Vec<PassField>,
    #[serde(default)]
    pub auxiliary_fields: Vec<PassField>,
    #[serde(default)]
    pub back_fields: Vec<PassField>,
}

impl PassStructure {
    pub fn fields(&self, region: FieldRegion) -> &[PassField] {
        match region {
            FieldRegion::Header => &self.header_fields,
            FieldRegion::Primary => &self.primary_fields,
            FieldRegion::Secondary => &self.secondary_fields,
            FieldRegion::Auxiliary => &self.auxiliary_fields,
            FieldRegion::Back => &self.back_fields,
        }
    }

    pub fn fields_mut(&mut self, region: FieldRegion) -> &mut Vec<PassField> {
        match region {
            FieldRegion::Header => &mut self.header_fields,
            FieldRegion::Primary => &mut self.primary_fields,
            FieldRegion::Secondary => &mut self.secondary_fields,
            FieldRegion::Auxiliary => &mut self.auxiliary_fields,
            FieldRegion::Back => &mut self.back_fields,
        }
    }
}

/// Visual styling for a pass. Unset attributes are omitted from generated
/// documents rather than emitted as null.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PassStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_text: Option<String>,
}

/// Raw image assets packaged with a pass.
///
/// Content is taken verbatim. Resizing and other image processing is out of
/// scope for this crate; callers supply bytes at the dimensions the target
/// platform expects.
#[derive(Clone, Debug, Default)]
pub struct PassImages {
    pub icon: Option<Vec<u8>>,
    pub icon_2x: Option<Vec<u8>>,
    pub logo: Option<Vec<u8>>,
    pub logo_2x: Option<Vec<u8>>,
    pub strip: Option<Vec<u8>>,
    pub background: Option<Vec<u8>>,
    pub thumbnail: Option<Vec<u8>>,
}

impl PassImages {
    /// Present assets as (archive entry name, content) pairs.
    pub fn entries(&self) -> Vec<(&'static str, &[u8])> {
        [
            ("icon.png", &self.icon),
            ("icon@2x.png", &self.icon_2x),
            ("logo.png", &self.logo),
            ("logo@2x.png", &self.logo_2x),
            ("strip.png", &self.strip),
            ("background.png", &self.background),
            ("thumbnail.png", &self.thumbnail),
        ]
        .into_iter()
        .filter_map(|(name, data)| data.as_ref().map(|d| (name, d.as_slice())))
        .collect()
    }
}

/// A geofence location that makes a pass relevant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_text: Option<String>,
    #[serde(default = "Location::default_radius")]
    pub radius: f64,
}

impl Location {
    fn default_radius() -> f64 {
        100.0
    }

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            relevant_text: None,
            radius: Self::default_radius(),
        }
    }
}

/// Near-field communication payload for a pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NfcPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_public_key: Option<String>,
    #[serde(default)]
    pub requires_authentication: bool,
}

/// Reusable schema and default content for a class of passes.
///
/// Field lists are mutable up until a pass is generated from the template;
/// the generation pipeline itself never mutates a template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub organization_id: String,
    pub pass_type: PassType,
    #[serde(default)]
    pub structure: PassStructure,
    #[serde(default)]
    pub style: PassStyle,
    #[serde(skip)]
    pub images: PassImages,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfc: Option<NfcPayload>,
    #[serde(default)]
    pub barcode_format: BarcodeFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_service_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Per-instance data for a single issued pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PassData {
    pub template_id: String,
    pub customer_id: String,
    /// Globally unique serial number per issuer. Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Per-field value overrides, keyed by field key. Overrides template
    /// defaults when generating the pass document.
    #[serde(default)]
    pub field_values: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub voided: bool,
}

impl PassData {
    pub fn new(template_id: impl ToString, customer_id: impl ToString) -> Self {
        Self {
            template_id: template_id.to_string(),
            customer_id: customer_id.to_string(),
            ..Self::default()
        }
    }
}

/// Provider-facing summary of an issued pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassResponse {
    pub id: String,
    pub template_id: String,
    pub customer_id: String,
    pub serial_number: String,
    pub pass_type_identifier: String,
    pub authentication_token: String,
    pub organization_id: String,
    pub voided: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}
