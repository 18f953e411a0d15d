// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Content-hash manifest construction.

use {
    crate::error::WalletPassError,
    sha1::{Digest, Sha1},
    std::collections::BTreeMap,
};

/// Entry name of the pass document inside an archive.
pub const DOCUMENT_FILE_NAME: &str = "pass.json";

/// Entry name of the manifest inside an archive.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Entry name of the detached signature inside an archive.
pub const SIGNATURE_FILE_NAME: &str = "signature";

/// Mapping of packaged file name to lowercase hex digest of its content.
///
/// Keys iterate in filename order. The consuming platform does not require
/// an order; sorting is our choice, for stable output.
pub type Manifest = BTreeMap<String, String>;

/// Compute the content digest manifest over a set of files to package.
///
/// Digests every input file except pre-existing manifest/signature entries.
/// SHA-1 is mandated by the consuming platform's archive format. It is a
/// format compatibility requirement, not a security choice; the digests are
/// separately covered by the cryptographic signature over the manifest.
pub fn build_manifest(files: &BTreeMap<String, Vec<u8>>) -> Result<Manifest, WalletPassError> {
    let mut manifest = Manifest::new();

    for (name, data) in files {
        if name == MANIFEST_FILE_NAME || name == SIGNATURE_FILE_NAME {
            continue;
        }

        manifest.insert(name.clone(), hex::encode(Sha1::digest(data)));
    }

    if manifest.is_empty() {
        return Err(WalletPassError::Packaging(
            "no files to include in manifest".to_string(),
        ));
    }

    Ok(manifest)
}

/// Serialize a manifest to the key/value document form that gets signed and
/// packaged. The signature is computed over these exact bytes.
pub fn serialize_manifest(manifest: &Manifest) -> Result<Vec<u8>, WalletPassError> {
    Ok(serde_json::to_vec(manifest)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(entries: &[(&str, &[u8])]) -> BTreeMap<String, Vec<u8>> {
        entries
            .iter()
            .map(|(name, data)| (name.to_string(), data.to_vec()))
            .collect()
    }

    #[test]
    fn digests_are_hex_sha1() {
        let manifest = build_manifest(&files(&[("pass.json", b"hello")])).unwrap();

        assert_eq!(
            manifest.get("pass.json").map(|s| s.as_str()),
            Some("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
        );
    }

    #[test]
    fn manifest_is_deterministic() {
        let input = files(&[("pass.json", b"content"), ("icon.png", b"\x89PNG")]);

        assert_eq!(build_manifest(&input).unwrap(), build_manifest(&input).unwrap());
    }

    #[test]
    fn excludes_manifest_and_signature_entries() {
        let manifest = build_manifest(&files(&[
            ("pass.json", b"content"),
            ("manifest.json", b"stale"),
            ("signature", b"stale"),
        ]))
        .unwrap();

        assert_eq!(manifest.len(), 1);
        assert!(manifest.contains_key("pass.json"));
    }

    #[test]
    fn empty_input_is_a_packaging_error() {
        assert!(matches!(
            build_manifest(&BTreeMap::new()),
            Err(WalletPassError::Packaging(_))
        ));

        // Only excluded entries present is as empty as no entries at all.
        assert!(matches!(
            build_manifest(&files(&[("signature", b"x")])),
            Err(WalletPassError::Packaging(_))
        ));
    }

    #[test]
    fn serialized_form_orders_by_filename() {
        let manifest = build_manifest(&files(&[
            ("icon.png", b"a"),
            ("pass.json", b"b"),
            ("background.png", b"c"),
        ]))
        .unwrap();

        let serialized = String::from_utf8(serialize_manifest(&manifest).unwrap()).unwrap();
        let background = serialized.find("background.png").unwrap();
        let icon = serialized.find("icon.png").unwrap();
        let pass = serialized.find("pass.json").unwrap();

        assert!(background < icon && icon < pass);
    }
}
