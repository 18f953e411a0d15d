// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apple Wallet pass provider.
//!
//! Owns the `.pkpass` generation pipeline: document generation, manifest
//! construction, CMS signing, and zip packaging. Pass documents are persisted
//! through the configured [Storage] backend; the signed archive itself is
//! never cached, every [ApplePassProvider::generate_pass_file] call re-signs
//! from the stored document.

use {
    crate::{
        config::{AppleConfig, WalletConfig},
        document::generate_document,
        error::WalletPassError,
        manifest::{build_manifest, serialize_manifest, DOCUMENT_FILE_NAME},
        model::{PassData, PassResponse, PassTemplate, Platform},
        packaging::package,
        provider::PassProvider,
        signing::SigningMaterial,
        storage::Storage,
    },
    chrono::{DateTime, SecondsFormat, Utc},
    log::{debug, warn},
    serde_json::{json, Map, Value},
    std::{collections::BTreeMap, sync::Arc},
    uuid::Uuid,
};

/// Issues, updates, and serializes Apple Wallet passes.
///
/// Signing material is loaded once at construction and immutable afterwards;
/// a single provider can serve concurrent generation calls.
pub struct ApplePassProvider {
    config: AppleConfig,
    material: SigningMaterial,
    storage: Arc<dyn Storage>,
}

impl ApplePassProvider {
    /// Construct from a [WalletConfig].
    ///
    /// Validates the Apple configuration slice (reporting every missing
    /// field) and loads the certificate, private key, and WWDR certificate
    /// from the configured paths.
    pub fn new(config: &WalletConfig, storage: Arc<dyn Storage>) -> Result<Self, WalletPassError> {
        let config = AppleConfig::from_wallet_config(config)?;
        let material = SigningMaterial::from_pem_files(
            &config.certificate_path,
            &config.private_key_path,
            &config.wwdr_certificate_path,
        )?;

        Ok(Self::with_material(config, material, storage))
    }

    /// Construct from already-validated configuration and loaded material.
    pub fn with_material(
        config: AppleConfig,
        material: SigningMaterial,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            material,
            storage,
        }
    }

    fn pass_id(&self, serial_number: &str) -> String {
        format!("{}.{}", self.config.pass_type_identifier, serial_number)
    }

    fn download_url(&self, pass_id: &str) -> Option<String> {
        self.config
            .web_service_url
            .as_ref()
            .map(|url| format!("{}/passes/{}", url, pass_id))
    }

    fn store_document(
        &self,
        pass_id: &str,
        document: Map<String, Value>,
    ) -> Result<(), WalletPassError> {
        self.storage
            .store_pass(Platform::Apple.as_str(), pass_id, &Value::Object(document))
    }

    fn retrieve_document(&self, pass_id: &str) -> Result<Map<String, Value>, WalletPassError> {
        match self.storage.retrieve_pass(Platform::Apple.as_str(), pass_id)? {
            Value::Object(document) => Ok(document),
            _ => Err(WalletPassError::Validation(format!(
                "stored document for {} is not an object",
                pass_id
            ))),
        }
    }

    fn document_str(document: &Map<String, Value>, key: &str) -> String {
        document
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    fn document_timestamp(document: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
        document
            .get(key)
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn response_from_document(
        &self,
        pass_id: &str,
        document: &Map<String, Value>,
    ) -> PassResponse {
        let now = Utc::now();

        PassResponse {
            id: pass_id.to_string(),
            template_id: Self::document_str(document, "templateId"),
            customer_id: Self::document_str(document, "customerId"),
            serial_number: Self::document_str(document, "serialNumber"),
            pass_type_identifier: self.config.pass_type_identifier.clone(),
            authentication_token: Self::document_str(document, "authenticationToken"),
            organization_id: Self::document_str(document, "organizationId"),
            voided: document
                .get("voided")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            expiration_date: Self::document_timestamp(document, "expirationDate"),
            created_at: Self::document_timestamp(document, "createdAt").unwrap_or(now),
            updated_at: Self::document_timestamp(document, "updatedAt").unwrap_or(now),
            download_url: self.download_url(pass_id),
        }
    }
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl PassProvider for ApplePassProvider {
    fn platform(&self) -> Platform {
        Platform::Apple
    }

    fn create_pass(
        &self,
        data: &PassData,
        template: &PassTemplate,
    ) -> Result<PassResponse, WalletPassError> {
        let serial_number = data
            .serial_number
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut document = generate_document(&self.config, template, data, &serial_number)?;

        // The web service authentication token is minted at creation when the
        // template does not supply one and stays stable for the pass's life.
        let token = template
            .authentication_token
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        document.insert("authenticationToken".to_string(), json!(token));

        let now = Utc::now();
        document.insert("createdAt".to_string(), json!(rfc3339(now)));
        document.insert("updatedAt".to_string(), json!(rfc3339(now)));

        let pass_id = self.pass_id(&serial_number);
        debug!("creating Apple pass {}", pass_id);

        let response = self.response_from_document(&pass_id, &document);
        self.store_document(&pass_id, document)?;

        Ok(response)
    }

    fn update_pass(
        &self,
        pass_id: &str,
        data: &PassData,
        template: &PassTemplate,
    ) -> Result<PassResponse, WalletPassError> {
        let existing = self.retrieve_document(pass_id)?;

        let serial_number = match data.serial_number.clone() {
            Some(serial) => serial,
            None => Self::document_str(&existing, "serialNumber"),
        };

        let mut document = generate_document(&self.config, template, data, &serial_number)?;

        // Creation time and authentication token are identity, not content;
        // they survive updates.
        let token = Self::document_str(&existing, "authenticationToken");
        if !token.is_empty() {
            document.insert("authenticationToken".to_string(), json!(token));
        }

        if let Some(created_at) = existing.get("createdAt") {
            document.insert("createdAt".to_string(), created_at.clone());
        }
        document.insert("updatedAt".to_string(), json!(rfc3339(Utc::now())));

        debug!("updating Apple pass {}", pass_id);

        let response = self.response_from_document(pass_id, &document);
        self.store_document(pass_id, document)?;

        Ok(response)
    }

    fn get_pass(&self, pass_id: &str) -> Result<PassResponse, WalletPassError> {
        let document = self.retrieve_document(pass_id)?;

        Ok(self.response_from_document(pass_id, &document))
    }

    fn void_pass(&self, pass_id: &str) -> Result<PassResponse, WalletPassError> {
        let mut document = self.retrieve_document(pass_id)?;

        document.insert("voided".to_string(), json!(true));
        document.insert("updatedAt".to_string(), json!(rfc3339(Utc::now())));

        debug!("voiding Apple pass {}", pass_id);

        let response = self.response_from_document(pass_id, &document);
        self.store_document(pass_id, document)?;

        Ok(response)
    }

    /// Generate the signed `.pkpass` archive for a stored pass.
    ///
    /// The pipeline is linear: fetch document, build manifest over
    /// {document, static assets}, sign the manifest, package. Any stage
    /// failure aborts the call; no partial artifact is ever returned and
    /// nothing is retried.
    fn generate_pass_file(
        &self,
        pass_id: &str,
        template: &PassTemplate,
    ) -> Result<Vec<u8>, WalletPassError> {
        debug!("generating pass file for {}", pass_id);

        let document = self.retrieve_document(pass_id)?;
        let document_bytes = serde_json::to_vec(&document)?;

        let assets = template
            .images
            .entries()
            .into_iter()
            .map(|(name, data)| (name.to_string(), data.to_vec()))
            .collect::<BTreeMap<_, _>>();

        let mut files = assets.clone();
        files.insert(DOCUMENT_FILE_NAME.to_string(), document_bytes.clone());

        let manifest = build_manifest(&files)?;
        let manifest_bytes = serialize_manifest(&manifest)?;

        let signature = self.material.sign_manifest(&manifest_bytes)?;

        package(&document_bytes, &manifest_bytes, &signature, &assets)
    }

    fn send_update_notification(&self, pass_id: &str) -> Result<bool, WalletPassError> {
        // Push delivery over APNs is out of scope for this crate.
        warn!(
            "APNs delivery is not implemented; no update notification sent for {}",
            pass_id
        );

        Ok(false)
    }
}
