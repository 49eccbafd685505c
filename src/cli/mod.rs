//! Command-line interface for prms-eval.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::{EvalConfig, DEFAULT_MAX_CONTEXT_CHARS};
use crate::llm::ChatClient;
use crate::pipeline::{PipelineRunner, ResultLog};
use crate::report::ReportKind;
use crate::source::FsDocumentSource;

/// Evaluate research-result submissions against human-reported metadata.
#[derive(Debug, Parser)]
#[command(name = "prms-eval", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the innovation-readiness evaluation.
    Readiness(RunArgs),
    /// Run the geographic-location and impact-area tagging evaluation.
    Tags(RunArgs),
}

/// Flags shared by both report kinds.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory with one subdirectory per project.
    #[arg(long)]
    pub root: PathBuf,

    /// Append-only JSONL result log. Defaults to a per-report file name
    /// in the working directory.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, env = "PRMS_EVAL_API_BASE")]
    pub api_base: String,

    /// Bearer token for the endpoint.
    #[arg(long, env = "PRMS_EVAL_API_KEY")]
    pub api_key: Option<String>,

    /// Character budget for concatenated document text.
    #[arg(long, default_value_t = DEFAULT_MAX_CONTEXT_CHARS)]
    pub max_context_chars: usize,

    /// Override the extraction-stage model identifier.
    #[arg(long)]
    pub extract_model: Option<String>,

    /// Override the summary-stage model identifier.
    #[arg(long)]
    pub summary_model: Option<String>,

    /// Override the tag-stage model identifier.
    #[arg(long)]
    pub tag_model: Option<String>,
}

impl RunArgs {
    fn into_config(self, kind: ReportKind) -> EvalConfig {
        let log_path = self
            .log
            .unwrap_or_else(|| PathBuf::from(kind.default_log_name()));
        EvalConfig {
            root: self.root,
            log_path,
            api_base: self.api_base,
            api_key: self.api_key,
            max_context_chars: self.max_context_chars,
            extract_model: self.extract_model,
            summary_model: self.summary_model,
            tag_model: self.tag_model,
        }
    }
}

/// Parses command-line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the selected evaluation.
///
/// Configuration problems abort before any item is processed; per-item
/// failures are reported and the process still exits 0 once the loop
/// completes.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let (kind, args) = match cli.command {
        Command::Readiness(args) => (ReportKind::Readiness, args),
        Command::Tags(args) => (ReportKind::GeoImpact, args),
    };

    let config = args.into_config(kind);
    config.validate()?;

    let source = FsDocumentSource::new(&config.root);
    let client = ChatClient::new(config.api_base.clone(), config.api_key.clone());
    let log = ResultLog::new(&config.log_path);
    let params = config.stage_params(kind);

    let runner = PipelineRunner::new(
        &source,
        &client,
        kind,
        log,
        params,
        config.max_context_chars,
    );
    let summary = runner.run().await?;

    info!(
        processed = summary.processed,
        failed = summary.failed,
        skipped = summary.skipped,
        "done"
    );
    println!(
        "items processed: {}, items failed: {}, items skipped: {}",
        summary.processed, summary.failed, summary.skipped
    );
    Ok(())
}
