// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Digital wallet pass generation and signing.
//!
//! This crate issues passes for mobile wallet applications. Its centerpiece
//! is the Apple Wallet `.pkpass` pipeline: render a typed pass template and
//! per-customer data into a `pass.json` document, digest every archive file
//! into a SHA-1 manifest, produce a detached RFC 5652 Cryptographic Message
//! Syntax (CMS) signature over the manifest with the issuer's certificate and
//! Apple's WWDR intermediate, and package the whole thing as a zip archive a
//! device will accept. No Apple hardware or web service is required to
//! produce a pass; you need only the certificates Apple issues to your
//! developer account.
//!
//! # Architecture
//!
//! * [model] defines the typed vocabulary: platforms, pass categories, field
//!   regions, templates, and per-pass instance data.
//! * [template] provides canned templates for the common pass categories.
//! * [storage] persists generated pass documents behind the [Storage] trait,
//!   with filesystem and in-memory backends.
//! * [document], [manifest], [signing], and [packaging] are the pipeline
//!   stages. Each is a standalone, pure-ish function layer with no knowledge
//!   of the others.
//! * [apple] wires the stages into [ApplePassProvider], which owns the pass
//!   lifecycle for Apple Wallet.
//! * [provider] defines the [PassProvider] trait those lifecycles implement
//!   and [PassManager] for fanning operations out across platforms.
//!
//! # Example
//!
//! ```no_run
//! use {
//!     std::{collections::BTreeMap, sync::Arc},
//!     wallet_pass::{
//!         event_ticket_template, ApplePassProvider, FieldValue, MemoryStorage, PassData,
//!         PassManager, Platform, WalletConfig,
//!     },
//! };
//!
//! # fn main() -> Result<(), wallet_pass::WalletPassError> {
//! let config = WalletConfig {
//!     apple_pass_type_identifier: Some("pass.com.example.events".into()),
//!     apple_team_identifier: Some("ABCDE12345".into()),
//!     apple_organization_name: Some("Example Events".into()),
//!     apple_certificate_path: Some("certs/signer.pem".into()),
//!     apple_private_key_path: Some("certs/signer.key".into()),
//!     apple_wwdr_certificate_path: Some("certs/wwdr.pem".into()),
//!     ..Default::default()
//! };
//!
//! let mut manager = PassManager::new();
//! manager.register(Box::new(ApplePassProvider::new(
//!     &config,
//!     Arc::new(MemoryStorage::new()),
//! )?));
//!
//! let template = event_ticket_template("Summer Concert", "org-42", Platform::Apple);
//! let templates = BTreeMap::from([(Platform::Apple, template.clone())]);
//!
//! let mut data = PassData::new(&template.id, "customer-7");
//! data.field_values
//!     .insert("event_name".into(), FieldValue::Text("Summer Concert".into()));
//!
//! let responses = manager.create_pass(&mut data, &templates)?;
//! let pass_id = &responses[&Platform::Apple].id;
//!
//! let pkpass = manager.generate_pass_file(Platform::Apple, pass_id, &template)?;
//! std::fs::write("concert.pkpass", pkpass)?;
//! # Ok(())
//! # }
//! ```

pub mod apple;
pub mod config;
pub mod document;
pub mod error;
pub mod manifest;
pub mod model;
pub mod packaging;
pub mod provider;
pub mod signing;
pub mod storage;
pub mod template;

pub use {
    apple::ApplePassProvider,
    config::{AppleConfig, WalletConfig},
    error::WalletPassError,
    model::{
        BarcodeFormat, FieldRegion, FieldValue, Location, NfcPayload, PassData, PassField,
        PassImages, PassResponse, PassStructure, PassStyle, PassTemplate, PassType, Platform,
    },
    provider::{PassManager, PassProvider},
    signing::SigningMaterial,
    storage::{FileSystemStorage, MemoryStorage, Storage},
    template::{
        boarding_pass_template, coupon_template, event_ticket_template, loyalty_template,
    },
};
