//! Brain registry adapter: CRUD over the `brain_configs` registry, with
//! legacy-record normalization applied on every read.

use crate::store::{RegistryError, RegistryStore};
use anyhow::{anyhow, Context, Result};
use synapse_core::{BrainConfig, BrainRecord};

pub const BRAIN_CONFIGS_REGISTRY: &str = "brain_configs";

#[derive(Debug, Clone)]
pub struct BrainRegistry {
    store: RegistryStore,
}

impl BrainRegistry {
    pub fn new(store: RegistryStore) -> Self {
        Self { store }
    }

    /// Register a new brain. Fails if the name is taken.
    pub fn register(&self, config: &BrainConfig) -> Result<()> {
        let record = BrainRecord::from(config);
        let value = serde_json::to_value(&record)?;
        self.store
            .add(BRAIN_CONFIGS_REGISTRY, &config.brain_name, value)
            .with_context(|| format!("Failed to register brain '{}'", config.brain_name))?;
        tracing::info!(
            brain = %config.brain_name,
            source_type = config.source_type.as_str(),
            source = %config.neuron_source,
            "Registered brain"
        );
        Ok(())
    }

    /// Replace the configuration of an existing brain.
    pub fn update(&self, config: &BrainConfig) -> Result<()> {
        let record = BrainRecord::from(config);
        let value = serde_json::to_value(&record)?;
        self.store
            .update(BRAIN_CONFIGS_REGISTRY, &config.brain_name, value)
            .with_context(|| format!("Failed to update brain '{}'", config.brain_name))?;
        Ok(())
    }

    /// Load a brain's configuration, normalizing legacy records. A missing
    /// brain is a fatal error naming the id.
    pub fn get_config(&self, brain_name: &str) -> Result<BrainConfig> {
        let value = match self.store.get(BRAIN_CONFIGS_REGISTRY, brain_name) {
            Ok(v) => v,
            Err(RegistryError::KeyNotFound { .. }) => {
                return Err(anyhow!("Brain '{}' not found in registry", brain_name));
            }
            Err(e) => return Err(e.into()),
        };
        let record: BrainRecord = serde_json::from_value(value)
            .with_context(|| format!("Malformed config record for brain '{}'", brain_name))?;
        record.normalize(brain_name)
    }

    pub fn delete(&self, brain_name: &str) -> Result<()> {
        self.store
            .delete(BRAIN_CONFIGS_REGISTRY, brain_name)
            .with_context(|| format!("Failed to delete brain '{}'", brain_name))?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.store.list_keys(BRAIN_CONFIGS_REGISTRY)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use synapse_core::{NeuronSourceType, DEFAULT_CHUNK_MAX};
    use tempfile::TempDir;

    fn registry() -> (TempDir, BrainRegistry) {
        let dir = TempDir::new().unwrap();
        let reg = BrainRegistry::new(RegistryStore::new(dir.path()));
        (dir, reg)
    }

    #[test]
    fn test_register_and_get() {
        let (_dir, reg) = registry();
        let cfg =
            BrainConfig::new("docs", NeuronSourceType::Directory, "/data/docs", 1000).unwrap();
        reg.register(&cfg).unwrap();

        let loaded = reg.get_config("docs").unwrap();
        assert_eq!(loaded.brain_name, "docs");
        assert_eq!(loaded.source_type, NeuronSourceType::Directory);
        assert_eq!(loaded.neuron_source, "/data/docs");
        assert_eq!(loaded.chunk_max, 1000);
    }

    #[test]
    fn test_get_missing_brain_names_the_id() {
        let (_dir, reg) = registry();
        let err = reg.get_config("ghost_brain").unwrap_err();
        assert!(err.to_string().contains("ghost_brain"), "{}", err);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let (_dir, reg) = registry();
        let cfg = BrainConfig::new("docs", NeuronSourceType::Directory, "/d", 100).unwrap();
        reg.register(&cfg).unwrap();
        assert!(reg.register(&cfg).is_err());
    }

    #[test]
    fn test_legacy_record_is_normalized_on_read() {
        let (dir, reg) = registry();
        let store = RegistryStore::new(dir.path());
        store
            .add(
                BRAIN_CONFIGS_REGISTRY,
                "old_brain",
                json!({"directory": "/legacy/docs", "brain_name": "old_brain", "chunk_size": -1}),
            )
            .unwrap();

        let cfg = reg.get_config("old_brain").unwrap();
        assert_eq!(cfg.source_type, NeuronSourceType::Directory);
        assert_eq!(cfg.neuron_source, "/legacy/docs");
        assert_eq!(cfg.chunk_max, DEFAULT_CHUNK_MAX);
    }

    #[test]
    fn test_list_and_delete() {
        let (_dir, reg) = registry();
        for name in ["b", "a"] {
            let cfg = BrainConfig::new(name, NeuronSourceType::Directory, "/d", 100).unwrap();
            reg.register(&cfg).unwrap();
        }
        assert_eq!(reg.list().unwrap(), vec!["a", "b"]);
        reg.delete("a").unwrap();
        assert_eq!(reg.list().unwrap(), vec!["b"]);
        assert!(reg.delete("a").is_err());
    }
}
