//! Relevance classification ("cognize"): batch-judge every neuron of a brain
//! against a query.
//!
//! Each neuron gets one independent request, the whole set goes out as a
//! single batch, and failures are isolated per neuron: a response that
//! doesn't parse simply drops that neuron from the relevant set without
//! touching the others. Only a transport failure of the batch itself is
//! fatal.

use crate::content::load_neuron_content;
use crate::llm::{ChatMessage, CompletionParams, LlmClient};
use crate::parse::parse_json_record;
use crate::prompts::{classification_request, PromptContext};
use crate::resolve::NeuronResolver;
use anyhow::Result;
use serde::Deserialize;
use synapse_core::{BrainConfig, NeuronIdentifier, ReasoningMap};
use synapse_registry::RegistryStore;

/// Recorded when a judgment parsed but carried no reasoning string.
pub const NO_REASONING_PLACEHOLDER: &str = "No reasoning provided";

#[derive(Debug, Deserialize)]
struct Judgment {
    related_to: bool,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Classification result: the relevant subset in resolve order, plus the
/// per-neuron justification strings.
#[derive(Debug, Default)]
pub struct Cognition {
    pub relevant: Vec<NeuronIdentifier>,
    pub reasoning: ReasoningMap,
    /// How many neurons were actually judged: resolved neurons whose content
    /// loaded. Unreadable neurons are skipped before dispatch and not counted.
    pub considered: usize,
}

pub struct Cognizer<'a> {
    store: &'a RegistryStore,
    client: &'a dyn LlmClient,
    params: CompletionParams,
}

impl<'a> Cognizer<'a> {
    pub fn new(store: &'a RegistryStore, client: &'a dyn LlmClient, params: CompletionParams) -> Self {
        Self {
            store,
            client,
            params,
        }
    }

    /// Judge every neuron of the brain against the question. An empty corpus
    /// returns an empty result without any model calls.
    pub async fn classify(
        &self,
        config: &BrainConfig,
        ctx: &PromptContext,
        question: &str,
    ) -> Result<Cognition> {
        let neurons = NeuronResolver::new(self.store.clone()).resolve(config);
        if neurons.is_empty() {
            return Ok(Cognition::default());
        }

        // Build one request per loadable neuron; a neuron whose content
        // can't be read is skipped here, not fatal.
        let mut dispatched: Vec<NeuronIdentifier> = Vec::with_capacity(neurons.len());
        let mut requests: Vec<Vec<ChatMessage>> = Vec::with_capacity(neurons.len());
        for neuron in neurons {
            match load_neuron_content(self.store, &neuron) {
                Ok(content) => {
                    requests.push(classification_request(&content, ctx, question));
                    dispatched.push(neuron);
                }
                Err(e) => {
                    tracing::warn!(neuron = %neuron, "Skipping unreadable neuron: {}", e);
                }
            }
        }

        let considered = dispatched.len();
        let responses = self.client.batch(&requests, &self.params).await?;

        let mut cognition = Cognition {
            considered,
            ..Default::default()
        };
        for (neuron, response) in dispatched.into_iter().zip(responses) {
            let Some(judgment) = parse_json_record::<Judgment>(&response.text) else {
                tracing::debug!(neuron = %neuron, "Unparseable judgment, dropping neuron");
                continue;
            };
            if judgment.related_to {
                let reasoning = judgment
                    .reasoning
                    .unwrap_or_else(|| NO_REASONING_PLACEHOLDER.to_string());
                tracing::debug!(neuron = %neuron, "Neuron is related");
                cognition.reasoning.insert(neuron.clone(), reasoning);
                cognition.relevant.push(neuron);
            } else {
                tracing::debug!(neuron = %neuron, "Neuron is not related");
            }
        }
        Ok(cognition)
    }
}
