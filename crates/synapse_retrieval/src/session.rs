//! Query session: the single logical flow per query.
//!
//! Decodes the composite query, loads the brain, runs cognize → instruct,
//! and folds the generated fragments into an append-only instruction log.
//! The session owns the log for its lifetime, so several rounds of the same
//! conversation accumulate into one deduplicated document.

use crate::aggregate::InstructionLog;
use crate::cognize::Cognizer;
use crate::instruct::{Synthesis, Synthesizer};
use crate::llm::{CompletionParams, LlmClient};
use crate::prompts::PromptContext;
use anyhow::{bail, Result};
use std::sync::Arc;
use synapse_core::CompositeQuery;
use synapse_registry::{BrainRegistry, RegistryStore};
use uuid::Uuid;

/// Outcome of one query round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// The accumulated, deduplicated document after this round.
    pub answer: String,
    /// Neurons judged this round (loadable ones; unreadable sources are
    /// skipped during classification and not counted).
    pub considered: usize,
    /// Neurons judged relevant this round.
    pub relevant: usize,
}

pub struct BrainSession {
    id: Uuid,
    store: RegistryStore,
    brains: BrainRegistry,
    client: Arc<dyn LlmClient>,
    params: CompletionParams,
    log: InstructionLog,
}

impl BrainSession {
    pub fn new(store: RegistryStore, client: Arc<dyn LlmClient>, params: CompletionParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            brains: BrainRegistry::new(store.clone()),
            store,
            client,
            params,
            log: InstructionLog::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run one round: classify, synthesize, accumulate.
    ///
    /// `fallback_brain` is used when the composite query carries no
    /// `TargetBrain:` field. A brain, persona, or mode id that doesn't
    /// resolve is fatal; everything recoverable stays per-neuron.
    pub async fn query(&mut self, raw: &str, fallback_brain: Option<&str>) -> Result<RoundReport> {
        let decoded = CompositeQuery::decode(raw);
        let brain_name = match decoded.target_brain.as_deref().or(fallback_brain) {
            Some(name) => name.to_string(),
            None => bail!("Query names no target brain and no fallback was given"),
        };

        tracing::info!(session = %self.id, brain = %brain_name, "Starting query round");

        let config = self.brains.get_config(&brain_name)?;
        let ctx = PromptContext::lookup(&self.store, &decoded)?;

        let cognizer = Cognizer::new(&self.store, self.client.as_ref(), self.params.clone());
        let cognition = cognizer.classify(&config, &ctx, &decoded.question).await?;
        tracing::info!(
            session = %self.id,
            brain = %brain_name,
            considered = cognition.considered,
            relevant = cognition.relevant.len(),
            "Cognize complete"
        );

        let synthesizer = Synthesizer::new(&self.store, self.client.as_ref(), self.params.clone());
        let synthesis = synthesizer
            .synthesize(
                &cognition.relevant,
                &cognition.reasoning,
                &ctx,
                &decoded.question,
            )
            .await?;

        let relevant = cognition.relevant.len();
        match synthesis {
            Synthesis::Empty { notice } => Ok(RoundReport {
                answer: if self.log.is_empty() {
                    notice.to_string()
                } else {
                    self.log.finalize()
                },
                considered: cognition.considered,
                relevant,
            }),
            Synthesis::Generated(instructions) => {
                for instruction in instructions {
                    if instruction.text.is_empty() {
                        continue;
                    }
                    self.log.push(format!(
                        "From {}:\n{}",
                        instruction.neuron.label(),
                        instruction.text
                    ));
                }
                Ok(RoundReport {
                    answer: self.log.finalize(),
                    considered: cognition.considered,
                    relevant,
                })
            }
        }
    }

    /// The accumulated document across all rounds so far.
    pub fn finish(&self) -> String {
        self.log.finalize()
    }
}
