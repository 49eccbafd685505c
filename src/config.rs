//! Startup configuration.
//!
//! All runtime settings live in one [`EvalConfig`] built from CLI flags
//! and environment variables at process start, validated before any item
//! is processed, and passed by reference into the collaborators. Nothing
//! reads ambient globals after startup.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::llm::ModelParams;
use crate::report::ReportKind;

/// Default character budget for concatenated document text.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 240_000;

/// Resolved model parameters for the three stages of one report kind.
#[derive(Debug, Clone)]
pub struct StageParams {
    pub extract: ModelParams,
    pub summarize: ModelParams,
    pub tag: ModelParams,
}

/// Process-wide configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Directory with one subdirectory per project.
    pub root: PathBuf,
    /// Append-only JSONL result log.
    pub log_path: PathBuf,
    /// Base URL of the OpenAI-compatible endpoint.
    pub api_base: String,
    /// Optional bearer token for the endpoint.
    pub api_key: Option<String>,
    /// Character budget for concatenated document text.
    pub max_context_chars: usize,
    /// Model identifier overrides; defaults come from the report kind.
    pub extract_model: Option<String>,
    pub summary_model: Option<String>,
    pub tag_model: Option<String>,
}

impl EvalConfig {
    /// Checks the configuration before the run starts.
    ///
    /// Failures here are fatal: the run aborts before any item is
    /// processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::MissingApiBase);
        }
        if !self.root.is_dir() {
            return Err(ConfigError::InvalidRoot(self.root.clone()));
        }
        if self.max_context_chars == 0 {
            return Err(ConfigError::ZeroContextBudget);
        }
        Ok(())
    }

    /// Per-stage model parameters: the report kind's defaults with any
    /// configured model-id overrides applied.
    pub fn stage_params(&self, kind: ReportKind) -> StageParams {
        let defaults = kind.default_params();
        StageParams {
            extract: apply_override(defaults.extract, &self.extract_model),
            summarize: apply_override(defaults.summarize, &self.summary_model),
            tag: apply_override(defaults.tag, &self.tag_model),
        }
    }
}

fn apply_override(params: ModelParams, model: &Option<String>) -> ModelParams {
    match model {
        Some(model) => params.with_model(model.clone()),
        None => params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn config(root: PathBuf) -> EvalConfig {
        EvalConfig {
            root,
            log_path: PathBuf::from("results.jsonl"),
            api_base: "http://localhost:4000/v1".to_string(),
            api_key: None,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            extract_model: None,
            summary_model: None,
            tag_model: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        let dir = TempDir::new().expect("tempdir");
        assert!(config(dir.path().to_path_buf()).validate().is_ok());
    }

    #[test]
    fn missing_api_base_is_fatal() {
        let dir = TempDir::new().expect("tempdir");
        let mut cfg = config(dir.path().to_path_buf());
        cfg.api_base = "  ".to_string();
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::MissingApiBase
        ));
    }

    #[test]
    fn nonexistent_root_is_fatal() {
        let cfg = config(PathBuf::from("/nonexistent/prms-eval-root"));
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidRoot(_)
        ));
    }

    #[test]
    fn model_overrides_replace_only_the_id() {
        let dir = TempDir::new().expect("tempdir");
        let mut cfg = config(dir.path().to_path_buf());
        cfg.summary_model = Some("local/summarizer".to_string());

        let params = cfg.stage_params(ReportKind::Readiness);
        let defaults = ReportKind::Readiness.default_params();
        assert_eq!(params.summarize.model, "local/summarizer");
        assert_eq!(params.summarize.max_tokens, defaults.summarize.max_tokens);
        assert_eq!(params.extract.model, defaults.extract.model);
    }
}
