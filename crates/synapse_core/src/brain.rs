//! Brain configuration: the persisted record shape and its canonical form.
//!
//! Brains registered by older versions carry `{directory, chunk_size}` instead
//! of `{neuron_source_type, neuron_source, chunk_max}`. The legacy shape is
//! mapped onto the canonical one in a single normalization step
//! (`BrainRecord::normalize`) when a record is read or registered, so the rest
//! of the pipeline only ever sees `BrainConfig`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Default per-neuron character budget when a brain doesn't specify one.
pub const DEFAULT_CHUNK_MAX: usize = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronSourceType {
    /// Every surviving file under the source path is one neuron.
    Directory,
    /// One file, split into chunks when it exceeds `chunk_max`.
    File,
    /// Every key of the named registry is one neuron.
    RegistryKeys,
    /// The whole named registry is a single neuron.
    EntireRegistry,
}

impl NeuronSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeuronSourceType::Directory => "directory",
            NeuronSourceType::File => "file",
            NeuronSourceType::RegistryKeys => "registry_keys",
            NeuronSourceType::EntireRegistry => "entire_registry",
        }
    }
}

/// Canonical brain configuration. Read-only at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainConfig {
    pub brain_name: String,
    pub source_type: NeuronSourceType,
    /// A filesystem path for `Directory`/`File`, a registry name otherwise.
    pub neuron_source: String,
    /// Maximum character length per neuron before a file source is split.
    pub chunk_max: usize,
}

impl BrainConfig {
    pub fn new(
        brain_name: impl Into<String>,
        source_type: NeuronSourceType,
        neuron_source: impl Into<String>,
        chunk_max: usize,
    ) -> Result<Self> {
        let cfg = Self {
            brain_name: brain_name.into(),
            source_type,
            neuron_source: neuron_source.into(),
            chunk_max,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.brain_name.is_empty() {
            bail!("brain_name must not be empty");
        }
        if self.neuron_source.is_empty() {
            bail!("Brain '{}' has an empty neuron_source", self.brain_name);
        }
        if self.chunk_max == 0 {
            bail!("Brain '{}' has chunk_max = 0", self.brain_name);
        }
        Ok(())
    }
}

/// Persisted registry record for a brain, covering both the canonical shape
/// and the legacy `{directory, chunk_size}` aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrainRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neuron_source_type: Option<NeuronSourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neuron_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_max: Option<usize>,

    // Legacy aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<i64>,
}

impl BrainRecord {
    /// Map old shape → canonical shape. `key` is the registry key the record
    /// was stored under; it wins over any stale `brain_name` in the record.
    pub fn normalize(self, key: &str) -> Result<BrainConfig> {
        let source_type = match (self.neuron_source_type, &self.directory) {
            (Some(t), _) => t,
            (None, Some(_)) => NeuronSourceType::Directory,
            (None, None) => bail!(
                "Brain '{}' has neither neuron_source_type nor a legacy directory",
                key
            ),
        };

        let neuron_source = match (self.neuron_source, self.directory) {
            (Some(s), _) => s,
            (None, Some(dir)) => dir,
            (None, None) => String::new(),
        };

        // Legacy chunk_size used -1 for "whole file"; anything non-positive
        // falls back to the default budget.
        let chunk_max = self
            .chunk_max
            .or_else(|| self.chunk_size.filter(|&n| n > 0).map(|n| n as usize))
            .unwrap_or(DEFAULT_CHUNK_MAX);

        BrainConfig::new(key, source_type, neuron_source, chunk_max)
    }
}

impl From<&BrainConfig> for BrainRecord {
    fn from(cfg: &BrainConfig) -> Self {
        Self {
            brain_name: Some(cfg.brain_name.clone()),
            neuron_source_type: Some(cfg.source_type),
            neuron_source: Some(cfg.neuron_source.clone()),
            chunk_max: Some(cfg.chunk_max),
            directory: None,
            chunk_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_record() {
        let record: BrainRecord = serde_json::from_str(
            r#"{
                "brain_name": "docs_brain",
                "neuron_source_type": "registry_keys",
                "neuron_source": "rules_registry",
                "chunk_max": 5000
            }"#,
        )
        .unwrap();
        let cfg = record.normalize("docs_brain").unwrap();
        assert_eq!(cfg.source_type, NeuronSourceType::RegistryKeys);
        assert_eq!(cfg.neuron_source, "rules_registry");
        assert_eq!(cfg.chunk_max, 5000);
    }

    #[test]
    fn test_normalize_legacy_record() {
        let record: BrainRecord = serde_json::from_str(
            r#"{"directory": "/data/docs", "brain_name": "docs_brain", "chunk_size": -1}"#,
        )
        .unwrap();
        let cfg = record.normalize("docs_brain").unwrap();
        assert_eq!(cfg.source_type, NeuronSourceType::Directory);
        assert_eq!(cfg.neuron_source, "/data/docs");
        assert_eq!(cfg.chunk_max, DEFAULT_CHUNK_MAX);
    }

    #[test]
    fn test_normalize_legacy_positive_chunk_size() {
        let record: BrainRecord =
            serde_json::from_str(r#"{"directory": "/data/docs", "chunk_size": 400}"#).unwrap();
        let cfg = record.normalize("docs_brain").unwrap();
        assert_eq!(cfg.chunk_max, 400);
    }

    #[test]
    fn test_normalize_rejects_sourceless_record() {
        let record: BrainRecord = serde_json::from_str(r#"{"chunk_max": 100}"#).unwrap();
        assert!(record.normalize("broken_brain").is_err());
    }

    #[test]
    fn test_registry_key_wins_over_stale_name() {
        let record: BrainRecord = serde_json::from_str(
            r#"{"brain_name": "old_name", "neuron_source_type": "directory", "neuron_source": "/d"}"#,
        )
        .unwrap();
        let cfg = record.normalize("new_name").unwrap();
        assert_eq!(cfg.brain_name, "new_name");
    }

    #[test]
    fn test_new_rejects_zero_chunk_max() {
        assert!(BrainConfig::new("b", NeuronSourceType::File, "/f", 0).is_err());
        assert!(BrainConfig::new("b", NeuronSourceType::File, "", 100).is_err());
    }
}
