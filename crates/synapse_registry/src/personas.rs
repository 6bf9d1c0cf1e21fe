//! Persona and mode registries.
//!
//! Both share the same record shape, `{name, description, prompt_block}`,
//! and live under fixed registry names. Personas bias the tone of neuron
//! requests, modes bias the task framing; both are looked up by id at query
//! time.

use crate::store::{RegistryError, RegistryStore};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const PERSONAS_REGISTRY: &str = "brain_personas_registry";
pub const MODES_REGISTRY: &str = "brain_modes_registry";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBlockRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub prompt_block: String,
}

/// CRUD adapter over one of the two prompt-block registries.
#[derive(Debug, Clone)]
pub struct PromptBlockRegistry {
    store: RegistryStore,
    registry_name: &'static str,
    /// "persona" or "mode", used in error messages.
    entity: &'static str,
}

impl PromptBlockRegistry {
    pub fn personas(store: RegistryStore) -> Self {
        Self {
            store,
            registry_name: PERSONAS_REGISTRY,
            entity: "persona",
        }
    }

    pub fn modes(store: RegistryStore) -> Self {
        Self {
            store,
            registry_name: MODES_REGISTRY,
            entity: "mode",
        }
    }

    pub fn add(&self, id: &str, record: &PromptBlockRecord) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.store
            .add(self.registry_name, id, value)
            .with_context(|| format!("Failed to add {} '{}'", self.entity, id))?;
        Ok(())
    }

    pub fn upsert(&self, id: &str, record: &PromptBlockRecord) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.store.upsert(self.registry_name, id, value)?;
        Ok(())
    }

    /// Look up a record by id. A missing id is a fatal error naming it.
    pub fn get(&self, id: &str) -> Result<PromptBlockRecord> {
        let value = match self.store.get(self.registry_name, id) {
            Ok(v) => v,
            Err(RegistryError::KeyNotFound { .. }) => {
                return Err(anyhow!("{} '{}' not found in registry", self.entity, id));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_value(value)
            .with_context(|| format!("Malformed {} record '{}'", self.entity, id))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.store
            .delete(self.registry_name, id)
            .with_context(|| format!("Failed to delete {} '{}'", self.entity, id))?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.store.list_keys(self.registry_name)?)
    }
}

/// Install the default personas and modes, updating entries that already
/// exist. Returns the number of records written.
pub fn seed_defaults(store: &RegistryStore) -> Result<usize> {
    let personas = PromptBlockRegistry::personas(store.clone());
    let modes = PromptBlockRegistry::modes(store.clone());

    let mut written = 0;
    for (id, record) in default_personas() {
        personas.upsert(id, &record)?;
        written += 1;
    }
    for (id, record) in default_modes() {
        modes.upsert(id, &record)?;
        written += 1;
    }
    tracing::info!(count = written, "Seeded default personas and modes");
    Ok(written)
}

fn default_personas() -> Vec<(&'static str, PromptBlockRecord)> {
    vec![
        (
            "logical_philosopher",
            PromptBlockRecord {
                name: "Logical Philosopher".into(),
                description:
                    "Responds with rigorous logical analysis, like a seasoned analytic philosopher."
                        .into(),
                prompt_block: "You are a seasoned analytic philosopher. Evaluate every claim with \
                               meticulous logic, explicitly state premises, derive conclusions \
                               carefully, and avoid rhetorical flourish."
                    .into(),
            },
        ),
        (
            "senior_scientist",
            PromptBlockRecord {
                name: "Senior Scientist".into(),
                description: "Speaks as an experienced research scientist - methodical, \
                              evidence-driven, cautious with claims."
                    .into(),
                prompt_block: "You are a senior research scientist. Approach problems with \
                               experimental rigor, reference data when possible, articulate \
                               hypotheses and limitations clearly."
                    .into(),
            },
        ),
        (
            "senior_engineer",
            PromptBlockRecord {
                name: "Senior Engineer".into(),
                description:
                    "Acts as a pragmatic senior software engineer focused on real-world implementation."
                        .into(),
                prompt_block: "You are a senior software engineer. Provide concrete implementation \
                               guidance, highlight edge cases, and balance trade-offs pragmatically."
                    .into(),
            },
        ),
    ]
}

fn default_modes() -> Vec<(&'static str, PromptBlockRecord)> {
    vec![
        (
            "summarize",
            PromptBlockRecord {
                name: "Summarize".into(),
                description: "Comprehensively summarize in granular detail how the neuron content \
                              relates to the query."
                    .into(),
                prompt_block: "Task: Provide a clear, structured summary. Separate 'Neuron Content' \
                               from 'Query' and then explain, point-by-point, how the former \
                               relates to the latter."
                    .into(),
            },
        ),
        (
            "imagine",
            PromptBlockRecord {
                name: "Imagine".into(),
                description: "The query describes an imaginary idea. Imagine how the neuron \
                              content could relate to it."
                    .into(),
                prompt_block: "Task: Think creatively. Describe potential connections, synergies, \
                               or inspirations between the neuron content and the imagined \
                               scenario in the query."
                    .into(),
            },
        ),
        (
            "reify",
            PromptBlockRecord {
                name: "Reify".into(),
                description: "The query proposes a concrete idea. Detail how the neuron content \
                              can be used to make it real."
                    .into(),
                prompt_block: "Task: Provide actionable steps and considerations to turn the \
                               query's idea into reality using insights from the neuron content."
                    .into(),
            },
        ),
    ]
}
