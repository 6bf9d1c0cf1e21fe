pub mod brains;
pub mod personas;
pub mod store;

pub use brains::BrainRegistry;
pub use personas::{PromptBlockRecord, PromptBlockRegistry, MODES_REGISTRY, PERSONAS_REGISTRY};
pub use store::{RegistryError, RegistryStore};
