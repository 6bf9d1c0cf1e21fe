//! Loads the body of a neuron for prompt embedding.

use anyhow::{Context, Result};
use synapse_core::NeuronIdentifier;
use synapse_registry::RegistryStore;

/// Render a neuron's content as the text block embedded in its requests.
/// File neurons are read verbatim, registry neurons are rendered as pretty
/// JSON so the model sees field names.
pub fn load_neuron_content(store: &RegistryStore, neuron: &NeuronIdentifier) -> Result<String> {
    match neuron {
        NeuronIdentifier::FilePath { path } => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read neuron file {}", path.display())),
        NeuronIdentifier::FileChunk { path, start, end } => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read neuron file {}", path.display()))?;
            Ok(content.chars().skip(*start).take(end - start).collect())
        }
        NeuronIdentifier::RegistryKey { registry, key } => {
            let value = store.get(registry, key)?;
            serde_json::to_string_pretty(&value).context("Failed to render registry record")
        }
        NeuronIdentifier::EntireRegistry { registry } => {
            let all = store.get_all(registry)?;
            serde_json::to_string_pretty(&all).context("Failed to render registry")
        }
    }
}
