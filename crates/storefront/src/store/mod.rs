//! Durable key-value storage backed by a single JSON file.
//!
//! This is the storefront's persistence layer: one JSON object under the
//! configured data directory holds every slot (the serialized cart, auth
//! tokens, username). The contract is [`KeyValueStore`], which has no error
//! channel, so I/O failures are logged and absorbed here; a corrupt file
//! reads as empty. The store is process-local and single-writer per slot:
//! concurrent writers are last-writer-wins, an accepted race.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use boardhouse_core::KeyValueStore;

/// File name of the durable store inside the data directory.
pub const STORE_FILE: &str = "store.json";

/// Durable key-value store persisting to a JSON file.
///
/// Each operation reads the whole file, applies the change, and writes the
/// whole file back through an atomic rename, so a crash mid-write cannot
/// leave a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store under `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(STORE_FILE),
        })
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read durable store"
                );
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Durable store is corrupt, treating as empty"
            );
            BTreeMap::new()
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) {
        let encoded = match serde_json::to_string_pretty(entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize durable store");
                return;
            }
        };

        let tmp = self.path.with_extension("json.tmp");
        let result =
            std::fs::write(&tmp, encoded).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to write durable store"
            );
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: String) {
        let mut entries = self.read_all();
        entries.insert(key.to_owned(), value);
        self.write_all(&entries);
    }

    fn remove(&mut self, key: &str) {
        let mut entries = self.read_all();
        if entries.remove(key).is_some() {
            self.write_all(&entries);
        }
    }
}

/// Cloneable shared handle to one [`FileStore`].
///
/// The cart store and the auth flows both persist through the same file;
/// this handle serializes their read-modify-write cycles behind one mutex.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<FileStore>>,
}

impl SharedStore {
    /// Wrap a file store in a shared handle.
    #[must_use]
    pub fn new(store: FileStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FileStore> {
        // A poisoned lock only means a panic elsewhere; the file on disk is
        // still the source of truth.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.lock().set(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_data_dir() -> PathBuf {
        std::env::temp_dir().join(format!("boardhouse-store-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_set_get_remove_roundtrip() {
        let dir = temp_data_dir();
        let mut store = FileStore::open(&dir).unwrap();

        assert_eq!(store.get("cart"), None);
        store.set("cart", "[]".to_owned());
        assert_eq!(store.get("cart").as_deref(), Some("[]"));

        store.remove("cart");
        assert_eq!(store.get("cart"), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_values_survive_reopening() {
        let dir = temp_data_dir();
        {
            let mut store = FileStore::open(&dir).unwrap();
            store.set("username", "demo".to_owned());
        }

        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("username").as_deref(), Some("demo"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = temp_data_dir();
        let mut store = FileStore::open(&dir).unwrap();
        std::fs::write(dir.join(STORE_FILE), "{{{ not json").unwrap();

        assert_eq!(store.get("cart"), None);

        // Writes recover the store.
        store.set("cart", "[]".to_owned());
        assert_eq!(store.get("cart").as_deref(), Some("[]"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_shared_store_clones_see_writes() {
        let dir = temp_data_dir();
        let mut writer = SharedStore::new(FileStore::open(&dir).unwrap());
        let reader = writer.clone();

        writer.set("access_token", "abc".to_owned());
        assert_eq!(reader.get("access_token").as_deref(), Some("abc"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
