//! Model invocation for prms-eval.
//!
//! All stages call the model through the [`ModelClient`] trait, which
//! takes one rendered prompt and returns one text reply. The shipped
//! implementation is [`ChatClient`], a client for OpenAI-compatible
//! chat-completions endpoints; tests substitute stubs.

pub mod client;

use async_trait::async_trait;

use crate::error::LlmError;

pub use client::ChatClient;

/// Per-call model parameters.
///
/// Each stage of a report kind carries its own parameters (the original
/// deployment ran extraction, summarization and tagging against different
/// models with different budgets and temperatures).
#[derive(Debug, Clone)]
pub struct ModelParams {
    /// Model identifier understood by the endpoint.
    pub model: String,
    /// Maximum number of output tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl ModelParams {
    pub fn new(model: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Replaces the model identifier, keeping token budget and temperature.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A synchronous-per-call model collaborator.
///
/// One prompt in, one text reply out. Implementations do not retry;
/// failures surface as [`LlmError`] and are handled per item by the
/// pipeline runner.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, prompt: &str, params: &ModelParams) -> Result<String, LlmError>;
}
