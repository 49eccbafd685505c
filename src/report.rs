//! The two report kinds and their record assembly.
//!
//! A [`ReportKind`] binds the generic stages to one concrete pipeline:
//! which schema the extractor uses, which context fields feed the
//! summary prompt, which schema and prompt the tag stage uses, which
//! model parameters each stage runs with, and how reported and AI-derived
//! fields merge into the final result record.

use serde_json::{Map, Value};

use crate::config::StageParams;
use crate::llm::ModelParams;
use crate::prompts;
use crate::schema::{catalog, ExtractionSchema, StageResult};

/// Which evaluation to run over the document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Innovation-readiness scoring: extract the reported profile,
    /// summarize the evidence against the readiness ladder, tag a
    /// readiness level with justification.
    Readiness,
    /// Geographic-location and impact-area tagging with per-tag
    /// justifications.
    GeoImpact,
}

impl ReportKind {
    /// Schema for the extraction stage over the primary document.
    pub fn extraction_schema(&self) -> ExtractionSchema {
        match self {
            ReportKind::Readiness => catalog::innovation_profile(),
            ReportKind::GeoImpact => catalog::impact_profile(),
        }
    }

    /// Schema for the tag stage over the evidence summary.
    pub fn tag_schema(&self) -> ExtractionSchema {
        match self {
            ReportKind::Readiness => catalog::readiness(),
            ReportKind::GeoImpact => catalog::impact_area_tags(),
        }
    }

    /// Title and description pulled from the extracted profile into the
    /// summary prompt. Falls back to a marker when extraction produced a
    /// non-string value (validation guarantees presence).
    pub fn summary_context<'a>(&self, extracted: &'a StageResult) -> (&'a str, &'a str) {
        let (title_field, description_field) = match self {
            ReportKind::Readiness => ("short_title", "description"),
            ReportKind::GeoImpact => ("project_title", "description.description"),
        };
        (
            extracted.text(title_field).unwrap_or("Not provided"),
            extracted.text(description_field).unwrap_or("Not provided"),
        )
    }

    /// Renders the summary prompt for this report kind.
    pub fn render_summary_prompt(&self, title: &str, description: &str, evidence: &str) -> String {
        match self {
            ReportKind::Readiness => {
                prompts::build_readiness_summary_prompt(title, description, evidence)
            }
            ReportKind::GeoImpact => {
                prompts::build_impact_summary_prompt(title, description, evidence)
            }
        }
    }

    /// Renders the tag prompt for this report kind.
    pub fn render_tag_prompt(&self, format_instructions: &str, summary: &str) -> String {
        match self {
            ReportKind::Readiness => {
                prompts::build_readiness_tag_prompt(format_instructions, summary)
            }
            ReportKind::GeoImpact => prompts::build_impact_tag_prompt(format_instructions, summary),
        }
    }

    /// Default model parameters per stage.
    ///
    /// The token budgets and temperatures match the original deployment:
    /// a cheap extraction model at temperature 0, a long-context
    /// summarizer at 0.2 with a generous output budget, and a stronger
    /// tagging model at temperature 0.
    pub fn default_params(&self) -> StageParams {
        StageParams {
            extract: ModelParams::new("gpt-3.5-turbo-16k", 2048, 0.0),
            summarize: ModelParams::new("anthropic/claude-v2", 8192, 0.2),
            tag: ModelParams::new("gpt-4", 2048, 0.0),
        }
    }

    /// Default result-log file name for this report kind.
    pub fn default_log_name(&self) -> &'static str {
        match self {
            ReportKind::Readiness => "readiness.jsonl",
            ReportKind::GeoImpact => "geo_loc_ia_tags.jsonl",
        }
    }

    /// Merges reported and AI-derived fields into the per-item record.
    ///
    /// Exactly one such record is appended to the result log per
    /// completed item; `result_id` is the identifier the idempotence
    /// check scans for.
    pub fn build_record(&self, id: &str, reported: &StageResult, ai: &StageResult) -> Value {
        let mut record = Map::new();
        record.insert("result_id".to_string(), Value::String(id.to_string()));
        match self {
            ReportKind::Readiness => {
                record.insert(
                    "reported_readiness_level".to_string(),
                    reported.json_or_default("readiness_level"),
                );
                record.insert(
                    "reported_readiness_justif".to_string(),
                    reported.json_or_default("readiness_justif"),
                );
                record.insert(
                    "ai_readiness_level".to_string(),
                    ai.json_or_default("readiness_level"),
                );
                record.insert(
                    "ai_readiness_justif".to_string(),
                    ai.json_or_default("readiness_level_summary"),
                );
            }
            ReportKind::GeoImpact => {
                let reported_fields = [
                    ("reported_geographic_focus", "geographic_location.geographic_focus"),
                    ("reported_region", "geographic_location.region"),
                    ("reported_country", "geographic_location.country"),
                    ("reported_gender_tag", "impact_areas.gender_tag"),
                    ("reported_climate_tag", "impact_areas.climate_change_tag"),
                    ("reported_nutrition_tag", "impact_areas.nutrition_tag"),
                    ("reported_environment_tag", "impact_areas.environment_tag"),
                    ("reported_poverty_tag", "impact_areas.poverty_tag"),
                ];
                for (output, field) in reported_fields {
                    record.insert(output.to_string(), reported.json_or_default(field));
                }

                let ai_fields = [
                    ("ai_geographic_focus", "geographic_location.geographic_focus"),
                    ("ai_region", "geographic_location.region"),
                    ("ai_country", "geographic_location.country"),
                    ("ai_gender_tag", "impact_areas.gender_tag"),
                    ("ai_climate_tag", "impact_areas.climate_change_tag"),
                    ("ai_nutrition_tag", "impact_areas.nutrition_tag"),
                    ("ai_environment_tag", "impact_areas.environment_tag"),
                    ("ai_poverty_tag", "impact_areas.poverty_tag"),
                    ("ai_gender_tag_just", "impact_justifications.gender_tag_just"),
                    ("ai_climate_tag_just", "impact_justifications.climate_change_tag_just"),
                    ("ai_nutrition_tag_just", "impact_justifications.nutrition_tag_just"),
                    ("ai_environment_tag_just", "impact_justifications.environment_tag_just"),
                    ("ai_poverty_tag_just", "impact_justifications.poverty_tag_just"),
                ];
                for (output, field) in ai_fields {
                    record.insert(output.to_string(), ai.json_or_default(field));
                }
            }
        }
        Value::Object(record)
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Readiness => write!(f, "readiness"),
            ReportKind::GeoImpact => write!(f, "geo-impact"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::schema::FieldValue;

    #[test]
    fn readiness_record_pairs_reported_and_ai_fields() {
        let mut reported = StageResult::default();
        reported.insert(
            "readiness_level",
            FieldValue::Text("Level 7 - Prototype".to_string()),
        );
        reported.insert(
            "readiness_justif",
            FieldValue::Text("Field trials completed.".to_string()),
        );

        let mut ai = StageResult::default();
        ai.insert(
            "readiness_level",
            FieldValue::Text("Level 6 - Semi-controlled Testing".to_string()),
        );
        ai.insert(
            "readiness_level_summary",
            FieldValue::Text("Trials ran under semi-controlled conditions.".to_string()),
        );

        let record = ReportKind::Readiness.build_record("RES-1", &reported, &ai);
        assert_eq!(record["result_id"], "RES-1");
        assert_eq!(record["reported_readiness_level"], "Level 7 - Prototype");
        assert_eq!(
            record["ai_readiness_level"],
            "Level 6 - Semi-controlled Testing"
        );
        assert_eq!(
            record["ai_readiness_justif"],
            "Trials ran under semi-controlled conditions."
        );
    }

    #[test]
    fn geo_impact_record_keeps_list_values_as_arrays() {
        let mut reported = StageResult::default();
        reported.insert(
            "geographic_location.region",
            FieldValue::List(vec!["Africa".to_string(), "Asia".to_string()]),
        );

        let ai = StageResult::default();
        let record = ReportKind::GeoImpact.build_record("RES-2", &reported, &ai);
        assert_eq!(
            record["reported_region"],
            serde_json::json!(["Africa", "Asia"])
        );
        // Absent fields fall back to a marker rather than being omitted.
        assert_eq!(record["ai_gender_tag"], "Not provided");
    }

    #[test]
    fn summary_context_reads_report_specific_fields() {
        let mut extracted = StageResult::default();
        extracted.insert("project_title", FieldValue::Text("Title".to_string()));
        extracted.insert(
            "description.description",
            FieldValue::Text("Desc".to_string()),
        );

        let (title, description) = ReportKind::GeoImpact.summary_context(&extracted);
        assert_eq!(title, "Title");
        assert_eq!(description, "Desc");

        let (title, _) = ReportKind::Readiness.summary_context(&extracted);
        assert_eq!(title, "Not provided");
    }

    #[test]
    fn default_log_names_differ_per_kind() {
        assert_ne!(
            ReportKind::Readiness.default_log_name(),
            ReportKind::GeoImpact.default_log_name()
        );
    }
}
