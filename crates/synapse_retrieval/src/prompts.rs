//! Request assembly for the two neuron phases.
//!
//! Each neuron gets its own self-contained request: the neuron body plus the
//! optional persona and mode blocks are embedded in the system prompt, and
//! the question rides in the user message. No state is shared between the
//! requests of a batch.

use crate::llm::ChatMessage;
use anyhow::Result;
use synapse_core::CompositeQuery;
use synapse_registry::{PromptBlockRegistry, RegistryStore};

const COGNIZE_SYSTEM_PROMPT: &str = "You are a NeuronAgent. Determine if your neuron content is \
related to the query. Respond with a JSON object with two keys: 'related_to' (boolean) and \
'reasoning' (string explaining why).";

const INSTRUCT_SYSTEM_PROMPT: &str =
    "You are a NeuronAgent. Generate instructions based on your neuron content and the query.";

/// Persona and mode prompt blocks resolved once per query.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub persona_block: Option<String>,
    pub mode_block: Option<String>,
}

impl PromptContext {
    /// Resolve the persona and mode blocks for a decoded query: a registry id
    /// is looked up (a missing id is fatal and the error names it), an inline
    /// block is used as-is. When a query carries both, the id wins.
    pub fn lookup(store: &RegistryStore, query: &CompositeQuery) -> Result<Self> {
        let persona_block = match (query.persona_id.as_deref(), &query.persona_block) {
            (Some(id), _) => {
                Some(PromptBlockRegistry::personas(store.clone()).get(id)?.prompt_block)
            }
            (None, Some(block)) => Some(block.clone()),
            (None, None) => None,
        };
        let mode_block = match (query.mode_id.as_deref(), &query.mode_block) {
            (Some(id), _) => Some(PromptBlockRegistry::modes(store.clone()).get(id)?.prompt_block),
            (None, Some(block)) => Some(block.clone()),
            (None, None) => None,
        };
        Ok(Self {
            persona_block,
            mode_block,
        })
    }

    fn render_blocks(&self, content: &str) -> String {
        let mut blocks = vec![content.to_string()];
        if let Some(persona) = &self.persona_block {
            blocks.push(persona.clone());
        }
        if let Some(mode) = &self.mode_block {
            blocks.push(mode.clone());
        }
        blocks.join("\n\n")
    }
}

/// Build one relevance-classification request.
pub fn classification_request(
    content: &str,
    ctx: &PromptContext,
    question: &str,
) -> Vec<ChatMessage> {
    let system = format!(
        "{}\n\n<neuron content>\n{}\n</neuron content>",
        COGNIZE_SYSTEM_PROMPT,
        ctx.render_blocks(content)
    );
    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!("Query: {}", question)),
    ]
}

/// Build one instruction-generation request, carrying the classifier's
/// reasoning for why this neuron was selected.
pub fn instruction_request(
    content: &str,
    ctx: &PromptContext,
    question: &str,
    reasoning: &str,
) -> Vec<ChatMessage> {
    let system = format!(
        "{}\n\n<neuron content>\n{}\n</neuron content>",
        INSTRUCT_SYSTEM_PROMPT,
        ctx.render_blocks(content)
    );
    let user = format!(
        "Query: {}\n\nHow does this query relate to the content you are the Neuron for? Focus on \
         instructions: what guidance would you give for implementing or addressing this Query \
         based on your neuron content?\n\nReasoning for why you're being asked: {}\n\nDon't \
         hesitate to make clarifications based on my reasoning. I want you to be completely \
         honest. Respond with clear, actionable instructions in a JSON object with an \
         'instructions' key.",
        question, reasoning
    );
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
