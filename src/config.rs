// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Provider configuration.

use {
    crate::error::WalletPassError,
    serde::{Deserialize, Serialize},
    std::path::PathBuf,
};

/// Read-only bag of settings for all wallet platforms.
///
/// Every field is optional so a deployment can configure only the platforms
/// it uses. Each provider validates its own slice of this bag exactly once at
/// construction and fails fast when required fields are missing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    // Apple Wallet.
    pub apple_pass_type_identifier: Option<String>,
    pub apple_team_identifier: Option<String>,
    pub apple_organization_name: Option<String>,
    pub apple_certificate_path: Option<PathBuf>,
    pub apple_private_key_path: Option<PathBuf>,
    pub apple_wwdr_certificate_path: Option<PathBuf>,

    // Google Wallet.
    pub google_application_credentials: Option<PathBuf>,
    pub google_issuer_id: Option<String>,

    // Samsung Wallet.
    pub samsung_issuer_id: Option<String>,
    pub samsung_api_key: Option<String>,
    pub samsung_service_id: Option<String>,

    // Shared.
    pub storage_path: Option<PathBuf>,
    pub web_service_url: Option<String>,
}

impl WalletConfig {
    pub fn has_apple_config(&self) -> bool {
        self.apple_pass_type_identifier.is_some()
            && self.apple_team_identifier.is_some()
            && self.apple_certificate_path.is_some()
            && self.apple_private_key_path.is_some()
            && self.apple_wwdr_certificate_path.is_some()
    }

    pub fn has_google_config(&self) -> bool {
        self.google_application_credentials.is_some() && self.google_issuer_id.is_some()
    }

    pub fn has_samsung_config(&self) -> bool {
        self.samsung_issuer_id.is_some()
            && self.samsung_api_key.is_some()
            && self.samsung_service_id.is_some()
    }
}

/// Validated Apple Wallet configuration.
///
/// Produced by a single fallible construction step from [WalletConfig];
/// instances are never partially valid.
#[derive(Clone, Debug)]
pub struct AppleConfig {
    pub pass_type_identifier: String,
    pub team_identifier: String,
    pub organization_name: String,
    pub certificate_path: PathBuf,
    pub private_key_path: PathBuf,
    pub wwdr_certificate_path: PathBuf,
    pub web_service_url: Option<String>,
}

impl AppleConfig {
    /// Validate the Apple slice of a [WalletConfig].
    ///
    /// Reports every missing field, not just the first one encountered.
    pub fn from_wallet_config(config: &WalletConfig) -> Result<Self, WalletPassError> {
        let mut missing = vec![];

        if config.apple_pass_type_identifier.is_none() {
            missing.push("apple_pass_type_identifier");
        }
        if config.apple_team_identifier.is_none() {
            missing.push("apple_team_identifier");
        }
        if config.apple_organization_name.is_none() {
            missing.push("apple_organization_name");
        }
        if config.apple_certificate_path.is_none() {
            missing.push("apple_certificate_path");
        }
        if config.apple_private_key_path.is_none() {
            missing.push("apple_private_key_path");
        }
        if config.apple_wwdr_certificate_path.is_none() {
            missing.push("apple_wwdr_certificate_path");
        }

        match (
            config.apple_pass_type_identifier.clone(),
            config.apple_team_identifier.clone(),
            config.apple_organization_name.clone(),
            config.apple_certificate_path.clone(),
            config.apple_private_key_path.clone(),
            config.apple_wwdr_certificate_path.clone(),
        ) {
            (
                Some(pass_type_identifier),
                Some(team_identifier),
                Some(organization_name),
                Some(certificate_path),
                Some(private_key_path),
                Some(wwdr_certificate_path),
            ) => Ok(Self {
                pass_type_identifier,
                team_identifier,
                organization_name,
                certificate_path,
                private_key_path,
                wwdr_certificate_path,
                web_service_url: config.web_service_url.clone(),
            }),
            _ => Err(WalletPassError::Certificate(format!(
                "missing required Apple Wallet configuration fields: {}",
                missing.join(", ")
            ))),
        }
    }
}
