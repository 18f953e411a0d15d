// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Provider abstraction and multi-platform coordination.

use {
    crate::{
        error::WalletPassError,
        model::{PassData, PassResponse, PassTemplate, Platform},
    },
    log::{error, info},
    std::collections::BTreeMap,
};

/// A wallet platform backend.
///
/// Each provider owns the full pass lifecycle for one platform. Operations
/// take `&self`; implementations are expected to be safe to share across
/// threads behind an `Arc`.
pub trait PassProvider: Send + Sync {
    /// The platform this provider serves.
    fn platform(&self) -> Platform;

    /// Create and persist a new pass from a template and instance data.
    fn create_pass(
        &self,
        data: &PassData,
        template: &PassTemplate,
    ) -> Result<PassResponse, WalletPassError>;

    /// Regenerate a stored pass's document from new instance data.
    fn update_pass(
        &self,
        pass_id: &str,
        data: &PassData,
        template: &PassTemplate,
    ) -> Result<PassResponse, WalletPassError>;

    /// Look up a stored pass.
    fn get_pass(&self, pass_id: &str) -> Result<PassResponse, WalletPassError>;

    /// Mark a stored pass as void.
    fn void_pass(&self, pass_id: &str) -> Result<PassResponse, WalletPassError>;

    /// Serialize a stored pass into its platform distribution format.
    fn generate_pass_file(
        &self,
        pass_id: &str,
        template: &PassTemplate,
    ) -> Result<Vec<u8>, WalletPassError>;

    /// Notify installed instances of the pass that its content changed.
    ///
    /// Returns whether a notification was actually delivered.
    fn send_update_notification(&self, pass_id: &str) -> Result<bool, WalletPassError>;
}

/// Routes pass operations to registered platform providers.
///
/// Singular operations (create, update, get, void, generate) target one
/// platform and propagate that provider's errors unchanged. The plural
/// fan-out operations run against every registered platform, log individual
/// failures, and report the successes; they only error when no provider
/// handled the request at all.
#[derive(Default)]
pub struct PassManager {
    providers: BTreeMap<Platform, Box<dyn PassProvider>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any previous provider for its platform.
    pub fn register(&mut self, provider: Box<dyn PassProvider>) -> &mut Self {
        self.providers.insert(provider.platform(), provider);
        self
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.providers.keys().copied().collect()
    }

    fn provider(&self, platform: Platform) -> Result<&dyn PassProvider, WalletPassError> {
        self.providers
            .get(&platform)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                WalletPassError::Provider(format!(
                    "no provider registered for platform {}",
                    platform.as_str()
                ))
            })
    }

    /// Create the pass on every registered platform.
    ///
    /// A serial number is resolved once and shared across platforms so the
    /// same physical pass is correlated everywhere. Returns one response per
    /// platform that succeeded.
    pub fn create_pass(
        &self,
        data: &mut PassData,
        templates: &BTreeMap<Platform, PassTemplate>,
    ) -> Result<BTreeMap<Platform, PassResponse>, WalletPassError> {
        if data.serial_number.is_none() {
            data.serial_number = Some(uuid::Uuid::new_v4().to_string());
        }

        let mut responses = BTreeMap::new();

        for (platform, template) in templates {
            let provider = match self.provider(*platform) {
                Ok(provider) => provider,
                Err(e) => {
                    error!("create skipped for {}: {}", platform.as_str(), e);
                    continue;
                }
            };

            match provider.create_pass(data, template) {
                Ok(response) => {
                    info!("created {} pass {}", platform.as_str(), response.id);
                    responses.insert(*platform, response);
                }
                Err(e) => error!("create failed for {}: {}", platform.as_str(), e),
            }
        }

        if responses.is_empty() {
            return Err(WalletPassError::Provider(
                "pass creation failed on every requested platform".to_string(),
            ));
        }

        Ok(responses)
    }

    pub fn update_pass(
        &self,
        platform: Platform,
        pass_id: &str,
        data: &PassData,
        template: &PassTemplate,
    ) -> Result<PassResponse, WalletPassError> {
        self.provider(platform)?.update_pass(pass_id, data, template)
    }

    pub fn get_pass(
        &self,
        platform: Platform,
        pass_id: &str,
    ) -> Result<PassResponse, WalletPassError> {
        self.provider(platform)?.get_pass(pass_id)
    }

    pub fn void_pass(
        &self,
        platform: Platform,
        pass_id: &str,
    ) -> Result<PassResponse, WalletPassError> {
        self.provider(platform)?.void_pass(pass_id)
    }

    pub fn generate_pass_file(
        &self,
        platform: Platform,
        pass_id: &str,
        template: &PassTemplate,
    ) -> Result<Vec<u8>, WalletPassError> {
        self.provider(platform)?.generate_pass_file(pass_id, template)
    }

    /// Serialize the pass on every requested platform.
    ///
    /// Returns the per-platform archives that succeeded; failures are logged
    /// and skipped. Errors only when nothing succeeded.
    pub fn generate_pass_files(
        &self,
        pass_ids: &BTreeMap<Platform, String>,
        templates: &BTreeMap<Platform, PassTemplate>,
    ) -> Result<BTreeMap<Platform, Vec<u8>>, WalletPassError> {
        let mut files = BTreeMap::new();

        for (platform, pass_id) in pass_ids {
            let template = match templates.get(platform) {
                Some(template) => template,
                None => {
                    error!("no template supplied for {}", platform.as_str());
                    continue;
                }
            };

            match self
                .provider(*platform)
                .and_then(|p| p.generate_pass_file(pass_id, template))
            {
                Ok(file) => {
                    files.insert(*platform, file);
                }
                Err(e) => error!("generation failed for {}: {}", platform.as_str(), e),
            }
        }

        if files.is_empty() {
            return Err(WalletPassError::Provider(
                "pass file generation failed on every requested platform".to_string(),
            ));
        }

        Ok(files)
    }

    /// Push an update notification for the pass on every requested platform.
    ///
    /// Returns the platforms that actually delivered a notification.
    pub fn send_update_notifications(
        &self,
        pass_ids: &BTreeMap<Platform, String>,
    ) -> Vec<Platform> {
        let mut notified = vec![];

        for (platform, pass_id) in pass_ids {
            match self
                .provider(*platform)
                .and_then(|p| p.send_update_notification(pass_id))
            {
                Ok(true) => notified.push(*platform),
                Ok(false) => {}
                Err(e) => error!("notification failed for {}: {}", platform.as_str(), e),
            }
        }

        notified
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            apple::ApplePassProvider,
            config::AppleConfig,
            signing::SigningMaterial,
            storage::MemoryStorage,
            template::event_ticket_template,
        },
        std::sync::Arc,
    };

    const SIGNER_CERT_PEM: &[u8] = include_bytes!("testdata/signer-cert.pem");
    const SIGNER_KEY_PEM: &[u8] = include_bytes!("testdata/signer-key.pem");
    const CHAIN_CERT_PEM: &[u8] = include_bytes!("testdata/chain-cert.pem");

    fn apple_provider() -> ApplePassProvider {
        let config = AppleConfig {
            pass_type_identifier: "pass.com.example.test".to_string(),
            team_identifier: "ABCDE12345".to_string(),
            organization_name: "Test Organization".to_string(),
            certificate_path: "/unused".into(),
            private_key_path: "/unused".into(),
            wwdr_certificate_path: "/unused".into(),
            web_service_url: None,
        };
        let material =
            SigningMaterial::from_pem_data(SIGNER_CERT_PEM, SIGNER_KEY_PEM, CHAIN_CERT_PEM)
                .unwrap();

        ApplePassProvider::with_material(config, material, Arc::new(MemoryStorage::new()))
    }

    fn manager() -> PassManager {
        let mut manager = PassManager::new();
        manager.register(Box::new(apple_provider()));
        manager
    }

    #[test]
    fn create_shares_one_serial_across_platforms() {
        let manager = manager();

        let templates = BTreeMap::from([(
            Platform::Apple,
            event_ticket_template("Gig", "org-1", Platform::Apple),
        )]);

        let mut data = PassData::new("template-1", "customer-1");
        let responses = manager.create_pass(&mut data, &templates).unwrap();

        let serial = data.serial_number.clone().unwrap();
        assert_eq!(responses[&Platform::Apple].serial_number, serial);
    }

    #[test]
    fn singular_operations_route_and_propagate() {
        let manager = manager();
        let template = event_ticket_template("Gig", "org-1", Platform::Apple);

        let templates = BTreeMap::from([(Platform::Apple, template.clone())]);
        let mut data = PassData::new("template-1", "customer-1");
        let responses = manager.create_pass(&mut data, &templates).unwrap();
        let pass_id = responses[&Platform::Apple].id.clone();

        let fetched = manager.get_pass(Platform::Apple, &pass_id).unwrap();
        assert_eq!(fetched.id, pass_id);

        let voided = manager.void_pass(Platform::Apple, &pass_id).unwrap();
        assert!(voided.voided);

        assert!(matches!(
            manager.get_pass(Platform::Apple, "missing"),
            Err(WalletPassError::PassNotFound(_))
        ));
    }

    #[test]
    fn unregistered_platform_is_a_provider_error() {
        let manager = manager();

        assert!(matches!(
            manager.get_pass(Platform::Google, "anything"),
            Err(WalletPassError::Provider(_))
        ));
    }

    #[test]
    fn create_with_no_usable_platform_errors() {
        let manager = PassManager::new();

        let templates = BTreeMap::from([(
            Platform::Apple,
            event_ticket_template("Gig", "org-1", Platform::Apple),
        )]);

        let mut data = PassData::new("template-1", "customer-1");
        assert!(matches!(
            manager.create_pass(&mut data, &templates),
            Err(WalletPassError::Provider(_))
        ));
    }

    #[test]
    fn generate_pass_files_skips_failures() {
        let manager = manager();
        let template = event_ticket_template("Gig", "org-1", Platform::Apple);

        let templates = BTreeMap::from([(Platform::Apple, template.clone())]);
        let mut data = PassData::new("template-1", "customer-1");
        let responses = manager.create_pass(&mut data, &templates).unwrap();
        let pass_id = responses[&Platform::Apple].id.clone();

        // One good id, one pointing at an unregistered platform.
        let pass_ids = BTreeMap::from([
            (Platform::Apple, pass_id),
            (Platform::Google, "g-pass".to_string()),
        ]);
        let all_templates = BTreeMap::from([
            (Platform::Apple, template.clone()),
            (Platform::Google, template),
        ]);

        let files = manager.generate_pass_files(&pass_ids, &all_templates).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains_key(&Platform::Apple));
    }

    #[test]
    fn generate_pass_files_errors_when_all_fail() {
        let manager = manager();
        let template = event_ticket_template("Gig", "org-1", Platform::Apple);

        let pass_ids = BTreeMap::from([(Platform::Apple, "missing".to_string())]);
        let templates = BTreeMap::from([(Platform::Apple, template)]);

        assert!(matches!(
            manager.generate_pass_files(&pass_ids, &templates),
            Err(WalletPassError::Provider(_))
        ));
    }

    #[test]
    fn notifications_report_delivering_platforms() {
        let manager = manager();

        // The Apple provider has no push transport, so nothing is delivered.
        let pass_ids = BTreeMap::from([(Platform::Apple, "p".to_string())]);
        assert!(manager.send_update_notifications(&pass_ids).is_empty());
    }

    #[test]
    fn registered_platforms_are_listed() {
        let manager = manager();
        assert_eq!(manager.platforms(), vec![Platform::Apple]);
    }
}
