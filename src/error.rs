//! Error types for prms-eval operations.
//!
//! Defines error types for the major subsystems:
//! - Startup configuration
//! - Document loading and text extraction
//! - Model invocation
//! - Stage execution (prompt/parse/validate)
//! - Pipeline orchestration and result logging

use std::path::PathBuf;

use thiserror::Error;

/// Errors detected while validating startup configuration.
///
/// All of these are fatal: the run aborts before any item is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing API base URL: set --api-base or PRMS_EVAL_API_BASE")]
    MissingApiBase,

    #[error("Data root '{}' does not exist or is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("Context budget must be greater than zero")]
    ZeroContextBudget,
}

/// Errors that can occur while loading project documents.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The primary result document for a project is absent.
    #[error("Primary document for result '{id}' not found")]
    PrimaryMissing { id: String },

    /// The file format has no text extractor.
    #[error("Unsupported document format: {}", .path.display())]
    Unsupported { path: PathBuf },

    /// Text extraction from a readable file failed.
    #[error("Failed to extract text from '{}': {message}", .path.display())]
    Extract { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during model invocation.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while running one extraction/summary/tag stage.
#[derive(Debug, Error)]
pub enum StageError {
    /// The model reply could not be parsed against the declared schema.
    #[error("Malformed model reply for schema '{schema}': {reason} (reply: {snippet})")]
    MalformedResponse {
        schema: String,
        reason: String,
        snippet: String,
    },

    /// The reply parsed as JSON but lacks fields the schema declares.
    #[error("Model reply for schema '{schema}' is missing required fields: {}", .fields.join(", "))]
    MissingFields { schema: String, fields: Vec<String> },

    #[error("Model invocation failed: {0}")]
    Model(#[from] LlmError),
}

/// Errors that abort a pipeline run.
///
/// Per-item source and stage failures are captured by the runner and do
/// not surface here; only startup and result-log problems are fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to list projects: {0}")]
    Discovery(#[from] SourceError),

    #[error("Result log error: {0}")]
    Log(#[from] std::io::Error),

    #[error("Failed to serialize result record: {0}")]
    Record(#[from] serde_json::Error),
}
