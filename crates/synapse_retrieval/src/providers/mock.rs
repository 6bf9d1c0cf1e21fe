//! Mock LLM provider: deterministic responses for testing without API keys.
//!
//! Responses are consumed from a script in dispatch order: the default
//! `batch` fan-out polls futures in index order and each `complete` takes its
//! scripted response before first awaiting, so response `i` always pairs with
//! request `i`.

use crate::llm::{ChatMessage, CompletionParams, LlmClient, LlmResponse};
use anyhow::Result;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct MockProvider {
    model: String,
    script: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider that replies with the given texts in order, then falls back
    /// to the canned default.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            model: "mock".to_string(),
            script: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().expect("mock script lock").pop_front();
        let text = scripted
            .unwrap_or_else(|| format!("(Mock {} Response) I received your prompt.", self.model));
        Ok(LlmResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response() {
        let provider = MockProvider::new("test-model");
        let resp = provider
            .complete(&[ChatMessage::user("hi")], &CompletionParams::default())
            .await
            .unwrap();
        assert!(resp.text.contains("Mock"));
        assert!(resp.text.contains("test-model"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_responses_then_default() {
        let provider = MockProvider::with_responses(vec!["one".into()]);
        let params = CompletionParams::default();
        let first = provider.complete(&[], &params).await.unwrap();
        let second = provider.complete(&[], &params).await.unwrap();
        assert_eq!(first.text, "one");
        assert!(second.text.contains("Mock"));
        assert_eq!(provider.call_count(), 2);
    }
}
