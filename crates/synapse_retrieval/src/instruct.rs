//! Instruction synthesis ("instruct"): ask each relevant neuron for
//! actionable guidance.
//!
//! Unlike classification, a malformed response is never dropped here: the
//! raw text is used verbatim as that neuron's instructions, because any
//! guidance beats silence once a neuron has been judged relevant.

use crate::content::load_neuron_content;
use crate::llm::{ChatMessage, CompletionParams, LlmClient};
use crate::parse::parse_json_record;
use crate::prompts::{instruction_request, PromptContext};
use anyhow::Result;
use serde::Deserialize;
use synapse_core::{NeuronIdentifier, ReasoningMap};
use synapse_registry::RegistryStore;

/// Signalled (not raised) when synthesis is asked for an empty relevant set.
pub const NO_RELEVANT_NEURONS: &str = "No relevant neurons found for this query.";

/// Used when a relevant neuron has no recorded reasoning.
const GENERIC_REASONING: &str = "This neuron was deemed relevant to your query.";

#[derive(Debug, Deserialize)]
struct InstructionRecord {
    #[serde(default)]
    instructions: String,
}

/// One relevant neuron's generated guidance, in resolve order.
#[derive(Debug, Clone)]
pub struct NeuronInstruction {
    pub neuron: NeuronIdentifier,
    pub text: String,
}

/// Synthesis outcome: either the explicit empty-corpus signal or the
/// per-neuron instruction list.
#[derive(Debug)]
pub enum Synthesis {
    /// No relevant neurons; no model calls were made.
    Empty { notice: &'static str },
    Generated(Vec<NeuronInstruction>),
}

pub struct Synthesizer<'a> {
    store: &'a RegistryStore,
    client: &'a dyn LlmClient,
    params: CompletionParams,
}

impl<'a> Synthesizer<'a> {
    pub fn new(store: &'a RegistryStore, client: &'a dyn LlmClient, params: CompletionParams) -> Self {
        Self {
            store,
            client,
            params,
        }
    }

    /// Generate instructions from every relevant neuron, in the order given.
    pub async fn synthesize(
        &self,
        relevant: &[NeuronIdentifier],
        reasoning: &ReasoningMap,
        ctx: &PromptContext,
        question: &str,
    ) -> Result<Synthesis> {
        if relevant.is_empty() {
            return Ok(Synthesis::Empty {
                notice: NO_RELEVANT_NEURONS,
            });
        }

        let mut instructions: Vec<NeuronInstruction> = Vec::with_capacity(relevant.len());
        let mut dispatched: Vec<usize> = Vec::with_capacity(relevant.len());
        let mut requests: Vec<Vec<ChatMessage>> = Vec::with_capacity(relevant.len());

        for (idx, neuron) in relevant.iter().enumerate() {
            let neuron_reasoning = reasoning
                .get(neuron)
                .map(String::as_str)
                .unwrap_or(GENERIC_REASONING);
            match load_neuron_content(self.store, neuron) {
                Ok(content) => {
                    requests.push(instruction_request(&content, ctx, question, neuron_reasoning));
                    dispatched.push(idx);
                }
                Err(e) => {
                    // Still present in the result, with empty instructions.
                    tracing::warn!(neuron = %neuron, "Neuron became unreadable: {}", e);
                }
            }
            instructions.push(NeuronInstruction {
                neuron: neuron.clone(),
                text: String::new(),
            });
        }

        let responses = self.client.batch(&requests, &self.params).await?;

        for (idx, response) in dispatched.into_iter().zip(responses) {
            instructions[idx].text = match parse_json_record::<InstructionRecord>(&response.text) {
                Some(record) => record.instructions,
                // Parsing failed: the raw response is still guidance.
                None => response.text,
            };
        }

        Ok(Synthesis::Generated(instructions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn file_neurons(dir: &TempDir, files: &[(&str, &str)]) -> Vec<NeuronIdentifier> {
        files
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                std::fs::write(&path, content).unwrap();
                NeuronIdentifier::file(path)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_relevant_set_signals_without_calls() {
        let dir = TempDir::new().unwrap();
        let store = RegistryStore::new(dir.path());
        let provider = MockProvider::new("m");
        let synth = Synthesizer::new(&store, &provider, CompletionParams::default());

        let result = synth
            .synthesize(&[], &HashMap::new(), &PromptContext::default(), "q")
            .await
            .unwrap();
        match result {
            Synthesis::Empty { notice } => assert_eq!(notice, NO_RELEVANT_NEURONS),
            Synthesis::Generated(_) => panic!("expected the empty signal"),
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_instructions_follow_relevant_order() {
        let dir = TempDir::new().unwrap();
        let neurons = file_neurons(&dir, &[("a.md", "alpha"), ("b.md", "beta")]);
        let store = RegistryStore::new(dir.path().join("registries"));
        let provider = MockProvider::with_responses(vec![
            r#"{"instructions": "I1"}"#.into(),
            r#"{"instructions": "I2"}"#.into(),
        ]);
        let synth = Synthesizer::new(&store, &provider, CompletionParams::default());

        let mut reasoning = HashMap::new();
        reasoning.insert(neurons[0].clone(), "R1".to_string());
        reasoning.insert(neurons[1].clone(), "R2".to_string());

        let result = synth
            .synthesize(&neurons, &reasoning, &PromptContext::default(), "q")
            .await
            .unwrap();
        let Synthesis::Generated(instructions) = result else {
            panic!("expected instructions");
        };
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].text, "I1");
        assert_eq!(instructions[1].text, "I2");
        assert_eq!(instructions[0].neuron, neurons[0]);
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back_to_raw_text() {
        let dir = TempDir::new().unwrap();
        let neurons = file_neurons(&dir, &[("a.md", "alpha")]);
        let store = RegistryStore::new(dir.path().join("registries"));
        let provider =
            MockProvider::with_responses(vec!["Just do the thing carefully.".into()]);
        let synth = Synthesizer::new(&store, &provider, CompletionParams::default());

        let result = synth
            .synthesize(&neurons, &HashMap::new(), &PromptContext::default(), "q")
            .await
            .unwrap();
        let Synthesis::Generated(instructions) = result else {
            panic!("expected instructions");
        };
        assert_eq!(instructions[0].text, "Just do the thing carefully.");
    }

    #[tokio::test]
    async fn test_empty_parsed_instructions_stay_present() {
        let dir = TempDir::new().unwrap();
        let neurons = file_neurons(&dir, &[("a.md", "alpha")]);
        let store = RegistryStore::new(dir.path().join("registries"));
        let provider = MockProvider::with_responses(vec![r#"{"instructions": ""}"#.into()]);
        let synth = Synthesizer::new(&store, &provider, CompletionParams::default());

        let result = synth
            .synthesize(&neurons, &HashMap::new(), &PromptContext::default(), "q")
            .await
            .unwrap();
        let Synthesis::Generated(instructions) = result else {
            panic!("expected instructions");
        };
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].text, "");
    }

    #[tokio::test]
    async fn test_unreadable_neuron_keeps_empty_entry() {
        let dir = TempDir::new().unwrap();
        let mut neurons = file_neurons(&dir, &[("a.md", "alpha")]);
        neurons.push(NeuronIdentifier::file("/no/such/neuron.md"));
        let store = RegistryStore::new(dir.path().join("registries"));
        let provider =
            MockProvider::with_responses(vec![r#"{"instructions": "I1"}"#.into()]);
        let synth = Synthesizer::new(&store, &provider, CompletionParams::default());

        let result = synth
            .synthesize(&neurons, &HashMap::new(), &PromptContext::default(), "q")
            .await
            .unwrap();
        let Synthesis::Generated(instructions) = result else {
            panic!("expected instructions");
        };
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].text, "I1");
        assert_eq!(instructions[1].text, "");
        assert_eq!(provider.call_count(), 1);
    }
}
