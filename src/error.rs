// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    cryptographic_message_syntax::CmsError, thiserror::Error,
    x509_certificate::X509CertificateError,
};

/// Unified error type for wallet pass operations.
///
/// Every fallible operation in this crate surfaces one of these variants.
/// The variant identifies the stage that failed: input validation, signing
/// material handling, archive assembly, storage lookup, or multi-platform
/// dispatch. Errors are never downgraded while flowing out of the pass file
/// generation pipeline.
#[derive(Debug, Error)]
pub enum WalletPassError {
    #[error("pass validation error: {0}")]
    Validation(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("packaging error: {0}")]
    Packaging(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("pass not found: {0}")]
    PassNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("X.509 certificate handler error: {0}")]
    X509(#[from] X509CertificateError),

    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
