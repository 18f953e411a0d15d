// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pluggable storage backends for issued pass documents.

use {
    crate::error::WalletPassError,
    log::debug,
    serde_json::Value,
    std::{
        collections::HashMap,
        path::{Path, PathBuf},
        sync::Mutex,
    },
};

/// Key-value storage for pass documents, namespaced per provider.
pub trait Storage: Send + Sync {
    /// Persist a pass document under `provider`/`pass_id`.
    fn store_pass(
        &self,
        provider: &str,
        pass_id: &str,
        document: &Value,
    ) -> Result<(), WalletPassError>;

    /// Fetch a previously stored pass document.
    ///
    /// Fails with [WalletPassError::PassNotFound] when no document exists.
    fn retrieve_pass(&self, provider: &str, pass_id: &str) -> Result<Value, WalletPassError>;

    /// Delete a stored pass document. Returns whether a document was present.
    fn delete_pass(&self, provider: &str, pass_id: &str) -> Result<bool, WalletPassError>;

    /// List all pass IDs stored for a provider.
    fn list_passes(&self, provider: &str) -> Result<Vec<String>, WalletPassError>;
}

/// Filesystem-backed storage.
///
/// Documents live at `<root>/<provider>/passes/<pass_id>.json`.
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn pass_path(&self, provider: &str, pass_id: &str) -> PathBuf {
        self.root
            .join(provider)
            .join("passes")
            .join(format!("{}.json", pass_id))
    }
}

impl Storage for FileSystemStorage {
    fn store_pass(
        &self,
        provider: &str,
        pass_id: &str,
        document: &Value,
    ) -> Result<(), WalletPassError> {
        let path = self.pass_path(provider, pass_id);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, serde_json::to_vec_pretty(document)?)?;
        debug!("stored {} pass {} at {}", provider, pass_id, path.display());

        Ok(())
    }

    fn retrieve_pass(&self, provider: &str, pass_id: &str) -> Result<Value, WalletPassError> {
        let path = self.pass_path(provider, pass_id);

        if !path.exists() {
            return Err(WalletPassError::PassNotFound(format!(
                "{}/{}",
                provider, pass_id
            )));
        }

        let data = std::fs::read(&path)?;
        debug!(
            "retrieved {} pass {} from {}",
            provider,
            pass_id,
            path.display()
        );

        Ok(serde_json::from_slice(&data)?)
    }

    fn delete_pass(&self, provider: &str, pass_id: &str) -> Result<bool, WalletPassError> {
        let path = self.pass_path(provider, pass_id);

        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path)?;
        debug!("deleted {} pass {}", provider, pass_id);

        Ok(true)
    }

    fn list_passes(&self, provider: &str) -> Result<Vec<String>, WalletPassError> {
        let dir = self.root.join(provider).join("passes");

        if !dir.exists() {
            return Ok(vec![]);
        }

        let mut ids = vec![];

        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }

        ids.sort();

        Ok(ids)
    }
}

/// In-memory storage. Useful for tests.
#[derive(Default)]
pub struct MemoryStorage {
    passes: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, HashMap<String, Value>>> {
        // Mutex poisoning only happens if a holder panicked; recover the data.
        match self.passes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Storage for MemoryStorage {
    fn store_pass(
        &self,
        provider: &str,
        pass_id: &str,
        document: &Value,
    ) -> Result<(), WalletPassError> {
        self.lock()
            .entry(provider.to_string())
            .or_default()
            .insert(pass_id.to_string(), document.clone());

        Ok(())
    }

    fn retrieve_pass(&self, provider: &str, pass_id: &str) -> Result<Value, WalletPassError> {
        self.lock()
            .get(provider)
            .and_then(|passes| passes.get(pass_id))
            .cloned()
            .ok_or_else(|| WalletPassError::PassNotFound(format!("{}/{}", provider, pass_id)))
    }

    fn delete_pass(&self, provider: &str, pass_id: &str) -> Result<bool, WalletPassError> {
        Ok(self
            .lock()
            .get_mut(provider)
            .and_then(|passes| passes.remove(pass_id))
            .is_some())
    }

    fn list_passes(&self, provider: &str) -> Result<Vec<String>, WalletPassError> {
        let mut ids = self
            .lock()
            .get(provider)
            .map(|passes| passes.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        ids.sort();

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn roundtrip(storage: &dyn Storage) {
        let document = json!({"serialNumber": "abc", "voided": false});

        storage.store_pass("apple", "pass-1", &document).unwrap();
        assert_eq!(storage.retrieve_pass("apple", "pass-1").unwrap(), document);

        assert_eq!(storage.list_passes("apple").unwrap(), vec!["pass-1"]);
        assert!(storage.list_passes("google").unwrap().is_empty());

        assert!(storage.delete_pass("apple", "pass-1").unwrap());
        assert!(!storage.delete_pass("apple", "pass-1").unwrap());

        assert!(matches!(
            storage.retrieve_pass("apple", "pass-1"),
            Err(WalletPassError::PassNotFound(_))
        ));
    }

    #[test]
    fn memory_storage_roundtrip() {
        roundtrip(&MemoryStorage::new());
    }

    #[test]
    fn filesystem_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        roundtrip(&FileSystemStorage::new(dir.path()));
    }

    #[test]
    fn filesystem_storage_namespaces_providers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSystemStorage::new(dir.path());

        storage.store_pass("apple", "a", &json!({})).unwrap();
        storage.store_pass("google", "g", &json!({})).unwrap();

        assert_eq!(storage.list_passes("apple").unwrap(), vec!["a"]);
        assert_eq!(storage.list_passes("google").unwrap(), vec!["g"]);
        assert!(dir.path().join("apple/passes/a.json").exists());
    }
}
