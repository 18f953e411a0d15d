// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cryptographic signing of pass manifests.

use {
    crate::error::WalletPassError,
    cryptographic_message_syntax::{SignedDataBuilder, SignerBuilder},
    log::debug,
    std::path::Path,
    x509_certificate::{CapturedX509Certificate, InMemorySigningKeyPair},
};

/// Signing material for an issuing organization.
///
/// Holds the issuer certificate, its private key, and the platform's
/// intermediate certificate (Apple's WWDR CA for `.pkpass` output). Loaded
/// once at provider construction and immutable afterwards, so a single
/// instance can serve concurrent signing calls without coordination.
pub struct SigningMaterial {
    certificate: CapturedX509Certificate,
    private_key: InMemorySigningKeyPair,
    chain_certificate: CapturedX509Certificate,
}

impl SigningMaterial {
    /// Load signing material from PEM-encoded data.
    ///
    /// `certificate` and `chain_certificate` are X.509 certificates;
    /// `private_key` is a PKCS#8 private key matching `certificate`.
    pub fn from_pem_data(
        certificate: &[u8],
        private_key: &[u8],
        chain_certificate: &[u8],
    ) -> Result<Self, WalletPassError> {
        let certificate = CapturedX509Certificate::from_pem(certificate).map_err(|e| {
            WalletPassError::Certificate(format!("failed to parse signer certificate: {}", e))
        })?;

        let private_key = InMemorySigningKeyPair::from_pkcs8_pem(private_key).map_err(|e| {
            WalletPassError::Certificate(format!("failed to parse signer private key: {}", e))
        })?;

        let chain_certificate = CapturedX509Certificate::from_pem(chain_certificate)
            .map_err(|e| {
                WalletPassError::Certificate(format!("failed to parse chain certificate: {}", e))
            })?;

        Ok(Self {
            certificate,
            private_key,
            chain_certificate,
        })
    }

    /// Load signing material from PEM files on disk.
    pub fn from_pem_files(
        certificate_path: &Path,
        private_key_path: &Path,
        chain_certificate_path: &Path,
    ) -> Result<Self, WalletPassError> {
        let certificate = std::fs::read(certificate_path).map_err(|e| {
            WalletPassError::Certificate(format!(
                "failed to read certificate {}: {}",
                certificate_path.display(),
                e
            ))
        })?;

        let private_key = std::fs::read(private_key_path).map_err(|e| {
            WalletPassError::Certificate(format!(
                "failed to read private key {}: {}",
                private_key_path.display(),
                e
            ))
        })?;

        let chain_certificate = std::fs::read(chain_certificate_path).map_err(|e| {
            WalletPassError::Certificate(format!(
                "failed to read chain certificate {}: {}",
                chain_certificate_path.display(),
                e
            ))
        })?;

        Self::from_pem_data(&certificate, &private_key, &chain_certificate)
    }

    pub fn certificate(&self) -> &CapturedX509Certificate {
        &self.certificate
    }

    pub fn chain_certificate(&self) -> &CapturedX509Certificate {
        &self.chain_certificate
    }

    /// Produce a detached RFC 5652 SignedData signature over manifest bytes.
    ///
    /// The manifest content is digested into the signed attributes but not
    /// embedded in the returned DER document; verification requires the exact
    /// manifest bytes that were signed. The chain certificate is included in
    /// the signature's certificate set so consumers can build the issuer
    /// chain.
    pub fn sign_manifest(&self, manifest: &[u8]) -> Result<Vec<u8>, WalletPassError> {
        debug!("signing manifest ({} bytes)", manifest.len());

        let signature = SignedDataBuilder::default()
            .content_external(manifest.to_vec())
            .certificate(self.chain_certificate.clone())
            .signer(SignerBuilder::new(&self.private_key, self.certificate.clone()))
            .build_der()?;

        Ok(signature)
    }
}
