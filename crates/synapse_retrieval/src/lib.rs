pub mod aggregate;
pub mod cognize;
pub mod content;
pub mod instruct;
pub mod llm;
pub mod parse;
pub mod prompts;
pub mod providers;
pub mod resolve;
pub mod session;

pub use aggregate::InstructionLog;
pub use cognize::{Cognition, Cognizer};
pub use instruct::{NeuronInstruction, Synthesis, Synthesizer, NO_RELEVANT_NEURONS};
pub use llm::{ChatMessage, ChatRole, CompletionParams, LlmClient, LlmResponse};
pub use resolve::NeuronResolver;
pub use session::{BrainSession, RoundReport};
