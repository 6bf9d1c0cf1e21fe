//! Neuron source resolver: turns a brain configuration into the ordered list
//! of neuron identifiers for this query.
//!
//! Resolution is deterministic for a fixed corpus state (directory walks are
//! sorted, registry keys enumerate sorted) and never fatal: unreadable files
//! are logged and skipped, an unknown registry yields an empty sequence, and
//! an empty corpus is a valid "no relevant neurons" outcome.

use std::path::Path;
use synapse_core::{BrainConfig, NeuronIdentifier, NeuronSourceType};
use synapse_registry::RegistryStore;
use walkdir::WalkDir;

/// File extensions treated as compiled artifacts and never loaded as neurons.
const ARTIFACT_EXTENSIONS: &[&str] = &["pyc", "pyo", "o", "so", "a", "class", "rlib"];

/// Directory names treated as build caches; everything under them is skipped.
const BUILD_CACHE_DIRS: &[&str] = &["__pycache__", "target", "node_modules"];

#[derive(Debug, Clone)]
pub struct NeuronResolver {
    store: RegistryStore,
}

impl NeuronResolver {
    pub fn new(store: RegistryStore) -> Self {
        Self { store }
    }

    /// Resolve the brain's source into neuron identifiers, in a repeatable
    /// order. An empty result means "no neurons", not an error.
    pub fn resolve(&self, config: &BrainConfig) -> Vec<NeuronIdentifier> {
        let neurons = match config.source_type {
            NeuronSourceType::Directory => self.resolve_directory(&config.neuron_source),
            NeuronSourceType::File => self.resolve_file(&config.neuron_source, config.chunk_max),
            NeuronSourceType::RegistryKeys => self.resolve_registry_keys(&config.neuron_source),
            NeuronSourceType::EntireRegistry => {
                vec![NeuronIdentifier::entire_registry(&config.neuron_source)]
            }
        };
        tracing::debug!(
            brain = %config.brain_name,
            count = neurons.len(),
            "Resolved neurons"
        );
        neurons
    }

    fn resolve_directory(&self, root: &str) -> Vec<NeuronIdentifier> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // The registered root is exempt from the name filter; only
                // entries inside it are screened.
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !name.starts_with('.') && !BUILD_CACHE_DIRS.contains(&name.as_ref())
            });

        let mut neurons = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if is_artifact(entry.path()) {
                tracing::debug!(path = %entry.path().display(), "Skipping compiled artifact");
                continue;
            }
            neurons.push(NeuronIdentifier::file(entry.path()));
        }
        neurons
    }

    fn resolve_file(&self, path: &str, chunk_max: usize) -> Vec<NeuronIdentifier> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path, "Skipping unreadable file source: {}", e);
                return Vec::new();
            }
        };

        let len = content.chars().count();
        if len <= chunk_max {
            return vec![NeuronIdentifier::file(path)];
        }

        // Contiguous, non-overlapping char ranges of length chunk_max; the
        // last range may be shorter. Union covers [0, len).
        let mut neurons = Vec::new();
        let mut start = 0;
        while start < len {
            let end = (start + chunk_max).min(len);
            neurons.push(NeuronIdentifier::chunk(path, start, end));
            start = end;
        }
        neurons
    }

    fn resolve_registry_keys(&self, registry: &str) -> Vec<NeuronIdentifier> {
        match self.store.list_keys(registry) {
            Ok(keys) => keys
                .into_iter()
                .map(|key| NeuronIdentifier::registry_key(registry, key))
                .collect(),
            Err(e) => {
                tracing::warn!(registry, "Could not enumerate registry: {}", e);
                Vec::new()
            }
        }
    }
}

fn is_artifact(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ARTIFACT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
