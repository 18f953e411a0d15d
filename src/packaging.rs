// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Signed archive assembly.

use {
    crate::{
        error::WalletPassError,
        manifest::{DOCUMENT_FILE_NAME, MANIFEST_FILE_NAME, SIGNATURE_FILE_NAME},
    },
    std::{
        collections::BTreeMap,
        io::{Cursor, Write},
    },
};

/// Assemble the signed pass archive.
///
/// Produces a zip with each input as a top-level named entry: the pass
/// document, the manifest, the detached signature, and every static asset
/// under its own name. No nested directories. Entries are written in sorted
/// name order for stable output.
///
/// The archive is built entirely in memory and only returned once complete;
/// a failure at any point yields an error and no partial artifact.
pub fn package(
    document: &[u8],
    manifest: &[u8],
    signature: &[u8],
    assets: &BTreeMap<String, Vec<u8>>,
) -> Result<Vec<u8>, WalletPassError> {
    let mut entries: BTreeMap<&str, &[u8]> = BTreeMap::new();
    entries.insert(DOCUMENT_FILE_NAME, document);
    entries.insert(MANIFEST_FILE_NAME, manifest);
    entries.insert(SIGNATURE_FILE_NAME, signature);

    for (name, data) in assets {
        if entries.contains_key(name.as_str()) {
            return Err(WalletPassError::Packaging(format!(
                "static asset name collides with reserved archive entry: {}",
                name
            )));
        }

        entries.insert(name, data);
    }

    let mut zf = zip::ZipWriter::new(Cursor::new(vec![]));
    let options = zip::write::FileOptions::default().unix_permissions(0o644);

    for (name, data) in entries {
        zf.start_file(name, options)?;
        zf.write_all(data)?;
    }

    let writer = zf.finish()?;

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Read};

    fn read_entry(archive: &[u8], name: &str) -> Vec<u8> {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
        let mut file = zip.by_name(name).unwrap();
        let mut data = vec![];
        file.read_to_end(&mut data).unwrap();
        data
    }

    // Entry names in central directory order. `ZipArchive::file_names` does
    // not preserve it.
    fn entry_names(archive: &[u8]) -> Vec<String> {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
        let mut names = vec![];
        for i in 0..zip.len() {
            names.push(zip.by_index(i).unwrap().name().to_string());
        }
        names
    }

    #[test]
    fn archive_contains_exactly_the_inputs() {
        let assets = BTreeMap::from([
            ("icon.png".to_string(), b"icon".to_vec()),
            ("logo.png".to_string(), b"logo".to_vec()),
        ]);

        let archive = package(b"document", b"manifest", b"sig", &assets).unwrap();

        let mut names = entry_names(&archive);
        names.sort();
        assert_eq!(
            names,
            vec!["icon.png", "logo.png", "manifest.json", "pass.json", "signature"]
        );

        assert_eq!(read_entry(&archive, "pass.json"), b"document");
        assert_eq!(read_entry(&archive, "manifest.json"), b"manifest");
        assert_eq!(read_entry(&archive, "signature"), b"sig");
        assert_eq!(read_entry(&archive, "icon.png"), b"icon");
    }

    #[test]
    fn entries_are_written_in_sorted_order() {
        let assets = BTreeMap::from([("zz.png".to_string(), vec![1]), ("aa.png".to_string(), vec![2])]);

        let archive = package(b"d", b"m", b"s", &assets).unwrap();

        assert_eq!(
            entry_names(&archive),
            vec!["aa.png", "manifest.json", "pass.json", "signature", "zz.png"]
        );
    }

    #[test]
    fn reserved_entry_collision_is_rejected() {
        let assets = BTreeMap::from([("signature".to_string(), b"evil".to_vec())]);

        assert!(matches!(
            package(b"d", b"m", b"s", &assets),
            Err(WalletPassError::Packaging(_))
        ));
    }

    #[test]
    fn no_assets_is_fine() {
        let archive = package(b"d", b"m", b"s", &BTreeMap::new()).unwrap();
        assert_eq!(entry_names(&archive).len(), 3);
    }
}
