//! Pipeline orchestration.
//!
//! The [`PipelineRunner`] drives each discovered project through
//! load → extract → summarize → tag → log, strictly sequentially. One
//! item's failure never aborts the run: the failing stage and reason are
//! reported and the runner moves on. Appending the result record is the
//! only durable side effect, and items already present in the log are
//! skipped up front, so re-running the pipeline is idempotent.

pub mod log;

use serde_json::Value;
use tracing::{error, info};

use crate::config::StageParams;
use crate::error::PipelineError;
use crate::llm::ModelClient;
use crate::report::ReportKind;
use crate::source::DocumentSource;
use crate::stages::{StructuredExtractor, SummaryStage, TagStage};

pub use log::ResultLog;

/// The transition an item was attempting when it succeeded or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Extracted,
    Summarized,
    Tagged,
    Logged,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Loaded => write!(f, "loaded"),
            Stage::Extracted => write!(f, "extracted"),
            Stage::Summarized => write!(f, "summarized"),
            Stage::Tagged => write!(f, "tagged"),
            Stage::Logged => write!(f, "logged"),
        }
    }
}

/// Final state of one item within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// A record for this item was appended during this run.
    Logged,
    /// A record already existed; the item was not processed.
    Skipped,
    /// A stage failed; the item was abandoned for this run.
    Failed { stage: Stage, reason: String },
}

/// Outcome of one item.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub id: String,
    pub state: ItemState,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<ItemOutcome>,
}

struct ItemFailure {
    stage: Stage,
    reason: String,
}

fn fail(stage: Stage, err: impl std::fmt::Display) -> ItemFailure {
    ItemFailure {
        stage,
        reason: err.to_string(),
    }
}

/// Drives the three stages over every discovered project and appends one
/// record per completed item to the result log.
pub struct PipelineRunner<'a> {
    source: &'a dyn DocumentSource,
    client: &'a dyn ModelClient,
    kind: ReportKind,
    log: ResultLog,
    params: StageParams,
    max_context_chars: usize,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(
        source: &'a dyn DocumentSource,
        client: &'a dyn ModelClient,
        kind: ReportKind,
        log: ResultLog,
        params: StageParams,
        max_context_chars: usize,
    ) -> Self {
        Self {
            source,
            client,
            kind,
            log,
            params,
            max_context_chars,
        }
    }

    /// Runs the pipeline over all discovered items.
    ///
    /// Returns the run summary; per-item failures are recorded there and
    /// in the console output, never propagated. Only startup problems
    /// (discovery, log IO) abort the run.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let already_logged = self.log.logged_ids()?;
        let ids = self.source.list_projects()?;
        info!(
            report = %self.kind,
            discovered = ids.len(),
            already_logged = already_logged.len(),
            "starting evaluation run"
        );

        let mut summary = RunSummary::default();
        for id in ids {
            if already_logged.contains(&id) {
                info!(item = %id, "already logged, skipping");
                summary.skipped += 1;
                summary.outcomes.push(ItemOutcome {
                    id,
                    state: ItemState::Skipped,
                });
                continue;
            }

            match self.process_item(&id).await {
                Ok(record) => {
                    // The one durable side effect per item.
                    self.log.append(&record)?;
                    info!(item = %id, "record appended");
                    summary.processed += 1;
                    summary.outcomes.push(ItemOutcome {
                        id,
                        state: ItemState::Logged,
                    });
                }
                Err(failure) => {
                    error!(
                        item = %id,
                        stage = %failure.stage,
                        reason = %failure.reason,
                        "item failed, continuing with next item"
                    );
                    summary.failed += 1;
                    summary.outcomes.push(ItemOutcome {
                        id,
                        state: ItemState::Failed {
                            stage: failure.stage,
                            reason: failure.reason,
                        },
                    });
                }
            }
        }

        info!(
            report = %self.kind,
            processed = summary.processed,
            failed = summary.failed,
            skipped = summary.skipped,
            "evaluation run finished"
        );
        Ok(summary)
    }

    /// Drives one item through the stages, returning its result record.
    async fn process_item(&self, id: &str) -> Result<Value, ItemFailure> {
        info!(item = %id, "loading result and evidence documents");
        let primary = self
            .source
            .load_primary(id)
            .map_err(|e| fail(Stage::Loaded, e))?;
        let evidence = self
            .source
            .load_evidence(id)
            .map_err(|e| fail(Stage::Loaded, e))?;

        info!(item = %id, segments = primary.len(), "extracting structured profile");
        let extraction_schema = self.kind.extraction_schema();
        let extractor = StructuredExtractor::new(
            self.client,
            self.params.extract.clone(),
            self.max_context_chars,
        );
        let extracted = extractor
            .extract(&primary, &extraction_schema)
            .await
            .map_err(|e| fail(Stage::Extracted, e))?;

        info!(item = %id, segments = evidence.len(), "summarizing evidence");
        let (title, description) = self.kind.summary_context(&extracted);
        let summarizer = SummaryStage::new(
            self.client,
            self.params.summarize.clone(),
            self.max_context_chars,
        );
        let summary = summarizer
            .summarize(&evidence, |text| {
                self.kind.render_summary_prompt(title, description, text)
            })
            .await
            .map_err(|e| fail(Stage::Summarized, e))?;

        info!(item = %id, "tagging from summary");
        let tag_schema = self.kind.tag_schema();
        let tagger = TagStage::new(self.client, self.params.tag.clone());
        let tags = tagger
            .tag(&summary, &tag_schema, |text| {
                self.kind
                    .render_tag_prompt(&tag_schema.format_instructions(), text)
            })
            .await
            .map_err(|e| fail(Stage::Tagged, e))?;

        Ok(self.kind.build_record(id, &extracted, &tags))
    }
}
