//! End-to-end pipeline tests with stub collaborators.
//!
//! These drive the real runner, stages, schemas and result log with an
//! in-memory document source and a scripted model, covering the
//! idempotence, partial-failure and schema-conformance guarantees.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use prms_eval::error::{LlmError, SourceError};
use prms_eval::llm::{ModelClient, ModelParams};
use prms_eval::pipeline::{ItemState, PipelineRunner, ResultLog, Stage};
use prms_eval::report::ReportKind;
use prms_eval::source::{DocumentSource, TextSegment};

/// Marker unique to the extraction prompt.
const EXTRACTION_MARKER: &str = "The text you are extracting information from";
/// Marker unique to the summary prompts.
const SUMMARY_MARKER: &str = "<evidence>";

#[derive(Default)]
struct ProjectDocs {
    primary: Option<Vec<TextSegment>>,
    evidence: Vec<TextSegment>,
}

/// In-memory document source keyed by project identifier.
#[derive(Default)]
struct StubSource {
    projects: BTreeMap<String, ProjectDocs>,
}

impl StubSource {
    fn with_project(mut self, id: &str, primary_text: Option<&str>, evidence: &[&str]) -> Self {
        self.projects.insert(
            id.to_string(),
            ProjectDocs {
                primary: primary_text
                    .map(|text| vec![TextSegment::new(text, format!("{id}/result.pdf"), 0)]),
                evidence: evidence
                    .iter()
                    .enumerate()
                    .map(|(page, text)| TextSegment::new(*text, format!("{id}/annex.pdf"), page))
                    .collect(),
            },
        );
        self
    }
}

impl DocumentSource for StubSource {
    fn list_projects(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.projects.keys().cloned().collect())
    }

    fn load_primary(&self, id: &str) -> Result<Vec<TextSegment>, SourceError> {
        self.projects
            .get(id)
            .and_then(|docs| docs.primary.clone())
            .ok_or_else(|| SourceError::PrimaryMissing { id: id.to_string() })
    }

    fn load_evidence(&self, id: &str) -> Result<Vec<TextSegment>, SourceError> {
        Ok(self
            .projects
            .get(id)
            .map(|docs| docs.evidence.clone())
            .unwrap_or_default())
    }
}

fn innovation_profile_reply(short_title: &str) -> String {
    serde_json::json!({
        "description": "A drought-tolerant maize variety.",
        "long_title": "Not Provided.",
        "short_title": short_title,
        "innovation_character": "Incremental innovation",
        "innovation_typology": "Technological innovation",
        "readiness_level": "Level 7 - Prototype",
        "readiness_justif": "Field trials were completed.",
    })
    .to_string()
}

fn readiness_tag_reply() -> String {
    serde_json::json!({
        "readiness_level": "Level 6 - Semi-controlled Testing",
        "readiness_level_summary": "Trials ran under semi-controlled conditions.",
    })
    .to_string()
}

/// Scripted model for the readiness report.
///
/// Routes on prompt markers; the extraction reply can be overridden per
/// item by matching a marker string carried in the primary document text.
struct ScriptedModel {
    /// (document marker, reply) pairs checked in order for extraction.
    extraction_overrides: Vec<(String, String)>,
    summary_calls: AtomicUsize,
    tag_calls: AtomicUsize,
}

impl ScriptedModel {
    fn new() -> Self {
        Self {
            extraction_overrides: Vec::new(),
            summary_calls: AtomicUsize::new(0),
            tag_calls: AtomicUsize::new(0),
        }
    }

    fn with_extraction_override(mut self, document_marker: &str, reply: &str) -> Self {
        self.extraction_overrides
            .push((document_marker.to_string(), reply.to_string()));
        self
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn invoke(&self, prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        if prompt.contains(EXTRACTION_MARKER) {
            for (marker, reply) in &self.extraction_overrides {
                if prompt.contains(marker.as_str()) {
                    return Ok(reply.clone());
                }
            }
            return Ok(innovation_profile_reply("Default project"));
        }
        if prompt.contains(SUMMARY_MARKER) {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            return Ok("<summary>\nThe project completed field trials.\n</summary>".to_string());
        }
        self.tag_calls.fetch_add(1, Ordering::SeqCst);
        Ok(readiness_tag_reply())
    }
}

fn log_lines(log_path: &std::path::Path) -> Vec<serde_json::Value> {
    if !log_path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(log_path)
        .expect("read log")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid record line"))
        .collect()
}

fn runner<'a>(
    source: &'a dyn DocumentSource,
    client: &'a dyn ModelClient,
    log_path: &std::path::Path,
) -> PipelineRunner<'a> {
    PipelineRunner::new(
        source,
        client,
        ReportKind::Readiness,
        ResultLog::new(log_path),
        ReportKind::Readiness.default_params(),
        100_000,
    )
}

#[tokio::test]
async fn missing_primary_fails_at_load_and_does_not_block_siblings() {
    let dir = TempDir::new().expect("tempdir");
    let log_path = dir.path().join("readiness.jsonl");

    let source = StubSource::default()
        .with_project("P1", Some("Primary text for P1"), &["Evidence for P1"])
        .with_project("P2", None, &[]);
    let model = ScriptedModel::new();

    let summary = runner(&source, &model, &log_path)
        .run()
        .await
        .expect("run completes");

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);

    let p2 = summary
        .outcomes
        .iter()
        .find(|o| o.id == "P2")
        .expect("P2 outcome");
    assert!(matches!(
        p2.state,
        ItemState::Failed {
            stage: Stage::Loaded,
            ..
        }
    ));

    let records = log_lines(&log_path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["result_id"], "P1");
    assert_eq!(records[0]["reported_readiness_level"], "Level 7 - Prototype");
    assert_eq!(
        records[0]["ai_readiness_level"],
        "Level 6 - Semi-controlled Testing"
    );
}

#[tokio::test]
async fn rerunning_appends_no_duplicate_records() {
    let dir = TempDir::new().expect("tempdir");
    let log_path = dir.path().join("readiness.jsonl");

    let source = StubSource::default()
        .with_project("P1", Some("Primary text for P1"), &["Evidence"])
        .with_project("P2", Some("Primary text for P2"), &[]);
    let model = ScriptedModel::new();

    let first = runner(&source, &model, &log_path)
        .run()
        .await
        .expect("first run");
    assert_eq!(first.processed, 2);
    assert_eq!(log_lines(&log_path).len(), 2);

    let second = runner(&source, &model, &log_path)
        .run()
        .await
        .expect("second run");
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(log_lines(&log_path).len(), 2);
}

#[tokio::test]
async fn malformed_extraction_is_isolated_to_its_item() {
    let dir = TempDir::new().expect("tempdir");
    let log_path = dir.path().join("readiness.jsonl");

    let source = StubSource::default()
        .with_project("A", Some("Primary text for project A"), &[])
        .with_project("B", Some("Primary text BREAKS-HERE for project B"), &[])
        .with_project("C", Some("Primary text for project C"), &[]);
    let model =
        ScriptedModel::new().with_extraction_override("BREAKS-HERE", "I refuse to emit JSON.");

    let summary = runner(&source, &model, &log_path)
        .run()
        .await
        .expect("run completes");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);

    let b = summary
        .outcomes
        .iter()
        .find(|o| o.id == "B")
        .expect("B outcome");
    match &b.state {
        ItemState::Failed { stage, reason } => {
            assert_eq!(*stage, Stage::Extracted);
            assert!(reason.contains("innovation_profile"), "reason: {reason}");
        }
        other => panic!("expected failure for B, got {other:?}"),
    }

    let ids: Vec<String> = log_lines(&log_path)
        .iter()
        .map(|r| r["result_id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids, vec!["A".to_string(), "C".to_string()]);
}

#[tokio::test]
async fn missing_required_fields_stop_before_the_summary_stage() {
    let dir = TempDir::new().expect("tempdir");
    let log_path = dir.path().join("readiness.jsonl");

    let source =
        StubSource::default().with_project("P1", Some("SPARSE primary text"), &["Evidence"]);
    let model =
        ScriptedModel::new().with_extraction_override("SPARSE", "{\"short_title\": \"X\"}");

    let summary = runner(&source, &model, &log_path)
        .run()
        .await
        .expect("run completes");

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 1);
    match &summary.outcomes[0].state {
        ItemState::Failed { stage, reason } => {
            assert_eq!(*stage, Stage::Extracted);
            assert!(reason.contains("missing required fields"), "reason: {reason}");
            assert!(reason.contains("readiness_level"), "reason: {reason}");
        }
        other => panic!("expected extraction failure, got {other:?}"),
    }
    assert_eq!(model.summary_calls.load(Ordering::SeqCst), 0);
    assert_eq!(model.tag_calls.load(Ordering::SeqCst), 0);
    assert!(log_lines(&log_path).is_empty());
}

#[tokio::test]
async fn empty_evidence_still_reaches_logged() {
    let dir = TempDir::new().expect("tempdir");
    let log_path = dir.path().join("readiness.jsonl");

    let source = StubSource::default().with_project("P1", Some("Primary text"), &[]);
    let model = ScriptedModel::new();

    let summary = runner(&source, &model, &log_path)
        .run()
        .await
        .expect("run completes");

    assert_eq!(summary.processed, 1);
    assert_eq!(model.summary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(log_lines(&log_path).len(), 1);
}

/// Scripted model for the geographic/impact-area report.
struct GeoScriptedModel;

#[async_trait]
impl ModelClient for GeoScriptedModel {
    async fn invoke(&self, prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
        if prompt.contains(EXTRACTION_MARKER) {
            return Ok(serde_json::json!({
                "project_title": "Seed systems in East Africa",
                "description": {"description": "Improved bean seed distribution."},
                "geographic_location": {
                    "geographic_focus": "Regional",
                    "region": ["Africa"],
                    "country": ["Kenya", "Uganda"],
                },
                "impact_areas": {
                    "gender_tag": "Significant",
                    "climate_change_tag": "Not Targeted",
                    "nutrition_tag": "Principal",
                    "environment_tag": "Not Targeted",
                    "poverty_tag": "Significant",
                },
            })
            .to_string());
        }
        if prompt.contains(SUMMARY_MARKER) {
            return Ok("<summary>Bean seed work across Kenya and Uganda.</summary>".to_string());
        }
        Ok(serde_json::json!({
            "geographic_location": {
                "geographic_focus": "Regional",
                "region": "Africa",
                "country": "Kenya",
            },
            "impact_areas": {
                "gender_tag": "Significant",
                "climate_change_tag": "Not Targeted",
                "nutrition_tag": "Principal",
                "environment_tag": "Not Targeted",
                "poverty_tag": "Significant",
            },
            "impact_justifications": {
                "gender_tag_just": "Women farmers were a deliberate focus.",
                "climate_change_tag_just": "No climate objective was found.",
                "nutrition_tag_just": "Bean consumption improves nutrition.",
                "environment_tag_just": "No environmental objective was found.",
                "poverty_tag_just": "Seed sales raised household incomes.",
            },
        })
        .to_string())
    }
}

#[tokio::test]
async fn geo_impact_report_pairs_reported_and_ai_tags() {
    let dir = TempDir::new().expect("tempdir");
    let log_path = dir.path().join("geo_loc_ia_tags.jsonl");

    let source = StubSource::default().with_project("R-100", Some("Primary text"), &["Evidence"]);
    let model = GeoScriptedModel;

    let runner = PipelineRunner::new(
        &source,
        &model,
        ReportKind::GeoImpact,
        ResultLog::new(&log_path),
        ReportKind::GeoImpact.default_params(),
        100_000,
    );
    let summary = runner.run().await.expect("run completes");
    assert_eq!(summary.processed, 1);

    let records = log_lines(&log_path);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["result_id"], "R-100");
    assert_eq!(record["reported_geographic_focus"], "Regional");
    assert_eq!(record["reported_country"], serde_json::json!(["Kenya", "Uganda"]));
    assert_eq!(record["ai_country"], "Kenya");
    assert_eq!(record["ai_nutrition_tag"], "Principal");
    assert_eq!(
        record["ai_gender_tag_just"],
        "Women farmers were a deliberate focus."
    );
}
