pub mod brain;
pub mod config;
pub mod neuron;
pub mod query;

pub use brain::{BrainConfig, BrainRecord, NeuronSourceType, DEFAULT_CHUNK_MAX};
pub use config::SynapseConfig;
pub use neuron::{NeuronIdentifier, ReasoningMap};
pub use query::{CompositeQuery, PromptBlockRef, QuerySpec};
