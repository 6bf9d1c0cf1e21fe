//! Neuron identifiers: one addressable unit of corpus content, identified
//! without having loaded its body yet. Generated per query, never persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Identifies one unit of content from a brain's corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeuronIdentifier {
    /// A whole file.
    FilePath { path: PathBuf },
    /// A contiguous character range of a file: `0 <= start < end <= len`.
    FileChunk {
        path: PathBuf,
        start: usize,
        end: usize,
    },
    /// One record of a registry.
    RegistryKey { registry: String, key: String },
    /// The whole registry as a single neuron.
    EntireRegistry { registry: String },
}

impl NeuronIdentifier {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        NeuronIdentifier::FilePath { path: path.into() }
    }

    pub fn chunk(path: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        NeuronIdentifier::FileChunk {
            path: path.into(),
            start,
            end,
        }
    }

    pub fn registry_key(registry: impl Into<String>, key: impl Into<String>) -> Self {
        NeuronIdentifier::RegistryKey {
            registry: registry.into(),
            key: key.into(),
        }
    }

    pub fn entire_registry(registry: impl Into<String>) -> Self {
        NeuronIdentifier::EntireRegistry {
            registry: registry.into(),
        }
    }

    /// Short human-readable label, used when framing instruction blocks.
    pub fn label(&self) -> String {
        match self {
            NeuronIdentifier::FilePath { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            NeuronIdentifier::FileChunk { path, start, end } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("{}[{}..{}]", name, start, end)
            }
            NeuronIdentifier::RegistryKey { registry, key } => format!("{}/{}", registry, key),
            NeuronIdentifier::EntireRegistry { registry } => registry.clone(),
        }
    }
}

impl fmt::Display for NeuronIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeuronIdentifier::FilePath { path } => write!(f, "file:{}", path.display()),
            NeuronIdentifier::FileChunk { path, start, end } => {
                write!(f, "chunk:{}[{}..{}]", path.display(), start, end)
            }
            NeuronIdentifier::RegistryKey { registry, key } => {
                write!(f, "registry:{}/{}", registry, key)
            }
            NeuronIdentifier::EntireRegistry { registry } => write!(f, "registry:{}", registry),
        }
    }
}

/// Per-neuron relevance justification, produced by the classifier and
/// consumed by the synthesizer. Values may be empty.
pub type ReasoningMap = HashMap<NeuronIdentifier, String>;
