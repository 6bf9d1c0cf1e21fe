//! Model-invocation collaborator boundary.
//!
//! The pipeline only ever shapes requests and parses responses; calling the
//! model, retrying, and rate limiting all live behind `LlmClient`. The one
//! capability the pipeline leans on is `batch`: given N independent message
//! lists it returns N responses in the same positional order, completing in
//! roughly the time of the slowest single call rather than the sum.

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
}

/// Completion parameters, shared by every request in a batch.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one chat completion request.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<LlmResponse>;

    /// Dispatch all requests concurrently; `response[i]` corresponds to
    /// `requests[i]`. Any single transport failure fails the whole batch;
    /// per-response recovery is the caller's concern, transport is not.
    async fn batch(
        &self,
        requests: &[Vec<ChatMessage>],
        params: &CompletionParams,
    ) -> Result<Vec<LlmResponse>> {
        let futures = requests.iter().map(|messages| self.complete(messages, params));
        join_all(futures).await.into_iter().collect()
    }
}
