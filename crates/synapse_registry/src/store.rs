//! JSON-file-backed key-value registry store.
//!
//! Each registry lives in one `<name>.json` file under the store root, holding
//! a map from key to `{value, updated_at}`. A registry whose file does not
//! exist enumerates as empty. `get` on a missing key is a typed error, so
//! callers can tell "not found" apart from a present-but-empty record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Key '{key}' not found in registry '{registry}'")]
    KeyNotFound { registry: String, key: String },
    #[error("Key '{key}' already exists in registry '{registry}'")]
    KeyExists { registry: String, key: String },
    #[error("Invalid registry name '{0}'")]
    InvalidName(String),
    #[error("Registry '{registry}' is corrupt: {source}")]
    Corrupt {
        registry: String,
        source: serde_json::Error,
    },
    #[error("Registry '{registry}' I/O error: {source}")]
    Io {
        registry: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    value: Value,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RegistryStore {
    root: PathBuf,
}

impl RegistryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert a new record. Fails if the key is already present.
    pub fn add(&self, registry: &str, key: &str, value: Value) -> Result<(), RegistryError> {
        let mut entries = self.load(registry)?;
        if entries.contains_key(key) {
            return Err(RegistryError::KeyExists {
                registry: registry.to_string(),
                key: key.to_string(),
            });
        }
        entries.insert(
            key.to_string(),
            Entry {
                value,
                updated_at: Utc::now(),
            },
        );
        self.save(registry, &entries)
    }

    /// Fetch a record. A missing key is an error, distinguishable from a
    /// present-but-empty record.
    pub fn get(&self, registry: &str, key: &str) -> Result<Value, RegistryError> {
        let entries = self.load(registry)?;
        entries
            .get(key)
            .map(|e| e.value.clone())
            .ok_or_else(|| RegistryError::KeyNotFound {
                registry: registry.to_string(),
                key: key.to_string(),
            })
    }

    /// Replace an existing record. Fails if the key is absent.
    pub fn update(&self, registry: &str, key: &str, value: Value) -> Result<(), RegistryError> {
        let mut entries = self.load(registry)?;
        if !entries.contains_key(key) {
            return Err(RegistryError::KeyNotFound {
                registry: registry.to_string(),
                key: key.to_string(),
            });
        }
        entries.insert(
            key.to_string(),
            Entry {
                value,
                updated_at: Utc::now(),
            },
        );
        self.save(registry, &entries)
    }

    /// Insert or replace, whichever applies.
    pub fn upsert(&self, registry: &str, key: &str, value: Value) -> Result<(), RegistryError> {
        let mut entries = self.load(registry)?;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                updated_at: Utc::now(),
            },
        );
        self.save(registry, &entries)
    }

    pub fn delete(&self, registry: &str, key: &str) -> Result<(), RegistryError> {
        let mut entries = self.load(registry)?;
        if entries.remove(key).is_none() {
            return Err(RegistryError::KeyNotFound {
                registry: registry.to_string(),
                key: key.to_string(),
            });
        }
        self.save(registry, &entries)
    }

    /// All keys of a registry, sorted. A nonexistent registry is empty.
    pub fn list_keys(&self, registry: &str) -> Result<Vec<String>, RegistryError> {
        Ok(self.load(registry)?.into_keys().collect())
    }

    /// All records of a registry, keyed and sorted. A nonexistent registry
    /// is empty.
    pub fn get_all(&self, registry: &str) -> Result<BTreeMap<String, Value>, RegistryError> {
        Ok(self
            .load(registry)?
            .into_iter()
            .map(|(k, e)| (k, e.value))
            .collect())
    }

    fn registry_path(&self, registry: &str) -> Result<PathBuf, RegistryError> {
        // Registry names become file names; keep them flat.
        if registry.is_empty()
            || registry
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        {
            return Err(RegistryError::InvalidName(registry.to_string()));
        }
        Ok(self.root.join(format!("{}.json", registry)))
    }

    fn load(&self, registry: &str) -> Result<BTreeMap<String, Entry>, RegistryError> {
        let path = self.registry_path(registry)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(RegistryError::Io {
                    registry: registry.to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| RegistryError::Corrupt {
            registry: registry.to_string(),
            source: e,
        })
    }

    fn save(&self, registry: &str, entries: &BTreeMap<String, Entry>) -> Result<(), RegistryError> {
        let path = self.registry_path(registry)?;
        let io_err = |e: std::io::Error| RegistryError::Io {
            registry: registry.to_string(),
            source: e,
        };
        std::fs::create_dir_all(&self.root).map_err(io_err)?;
        let content = serde_json::to_string_pretty(entries).map_err(|e| RegistryError::Corrupt {
            registry: registry.to_string(),
            source: e,
        })?;
        std::fs::write(&path, content).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, RegistryStore) {
        let dir = TempDir::new().unwrap();
        let store = RegistryStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_add_get_round_trip() {
        let (_dir, store) = store();
        store.add("rules", "rule_1", json!({"rule": "use type hints"})).unwrap();
        let value = store.get("rules", "rule_1").unwrap();
        assert_eq!(value["rule"], "use type hints");
    }

    #[test]
    fn test_get_missing_key_is_typed_not_found() {
        let (_dir, store) = store();
        store.add("rules", "rule_1", json!({})).unwrap();
        match store.get("rules", "nope") {
            Err(RegistryError::KeyNotFound { registry, key }) => {
                assert_eq!(registry, "rules");
                assert_eq!(key, "nope");
            }
            other => panic!("expected KeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_present_but_empty_record_is_not_not_found() {
        let (_dir, store) = store();
        store.add("rules", "empty", json!({})).unwrap();
        assert!(store.get("rules", "empty").is_ok());
    }

    #[test]
    fn test_add_duplicate_key_fails() {
        let (_dir, store) = store();
        store.add("rules", "rule_1", json!(1)).unwrap();
        assert!(matches!(
            store.add("rules", "rule_1", json!(2)),
            Err(RegistryError::KeyExists { .. })
        ));
    }

    #[test]
    fn test_update_then_delete() {
        let (_dir, store) = store();
        store.add("rules", "rule_1", json!(1)).unwrap();
        store.update("rules", "rule_1", json!(2)).unwrap();
        assert_eq!(store.get("rules", "rule_1").unwrap(), json!(2));
        store.delete("rules", "rule_1").unwrap();
        assert!(store.get("rules", "rule_1").is_err());
    }

    #[test]
    fn test_update_missing_key_fails() {
        let (_dir, store) = store();
        assert!(matches!(
            store.update("rules", "rule_1", json!(1)),
            Err(RegistryError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_nonexistent_registry_enumerates_empty() {
        let (_dir, store) = store();
        assert!(store.list_keys("no_such_registry").unwrap().is_empty());
        assert!(store.get_all("no_such_registry").unwrap().is_empty());
    }

    #[test]
    fn test_list_keys_sorted() {
        let (_dir, store) = store();
        store.add("rules", "b", json!(1)).unwrap();
        store.add("rules", "a", json!(2)).unwrap();
        store.add("rules", "c", json!(3)).unwrap();
        assert_eq!(store.list_keys("rules").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_registry_name_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.get("../escape", "k"),
            Err(RegistryError::InvalidName(_))
        ));
    }
}
