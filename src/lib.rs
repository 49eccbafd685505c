//! prms-eval: LLM-backed evaluation of research-result submissions.
//!
//! This library chains three model-backed stages over each project's
//! documents (structured extraction from the primary result document,
//! evidence summarization, tag assignment) and appends one JSON record
//! per completed item to an append-only result log. Items already
//! present in the log are skipped, so re-running the pipeline is
//! idempotent.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod schema;
pub mod source;
pub mod stages;

// Re-export commonly used error types
pub use error::{ConfigError, LlmError, PipelineError, SourceError, StageError};
