//! The three LLM-backed stages: extraction, summarization, tagging.
//!
//! All three share one shape: concatenate input text, render a prompt,
//! invoke the model once, and (for the structured stages) parse and
//! validate the JSON reply. No stage retries; failures surface as
//! [`StageError`] and are handled per item by the runner.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StageError;
use crate::llm::{ModelClient, ModelParams};
use crate::prompts;
use crate::schema::{snippet, ExtractionSchema, StageResult};
use crate::source::TextSegment;

/// Placeholder inserted in the evidence block when a project has no
/// loadable evidence, so the summary stage still runs.
pub const NO_EVIDENCE_PLACEHOLDER: &str = "(no evidence documents were provided)";

/// Concatenates segment texts in document order, truncating at the
/// character budget. Unbounded concatenation would eventually exceed the
/// model input limit, so the budget is explicit and truncation is logged.
pub fn concat_segments(segments: &[TextSegment], max_chars: usize) -> String {
    let mut text = String::new();
    for segment in segments {
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&segment.text);
    }
    let cut = text.char_indices().nth(max_chars).map(|(index, _)| index);
    if let Some(index) = cut {
        warn!(
            budget = max_chars,
            total = text.chars().count(),
            "concatenated text exceeds context budget, truncating"
        );
        text.truncate(index);
    }
    text
}

/// Parses a model reply expected to contain a single JSON object and
/// validates it against the schema.
///
/// Models wrap JSON in prose or Markdown fences often enough that the
/// reply is trimmed to its outermost braces before parsing.
pub fn parse_structured_reply(
    reply: &str,
    schema: &ExtractionSchema,
) -> Result<StageResult, StageError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let candidate = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(StageError::MalformedResponse {
                schema: schema.name.clone(),
                reason: "no JSON object found in reply".to_string(),
                snippet: snippet(reply),
            })
        }
    };

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| StageError::MalformedResponse {
            schema: schema.name.clone(),
            reason: e.to_string(),
            snippet: snippet(candidate),
        })?;

    schema.validate(&value)
}

/// Strips the `<summary>`/`</summary>` markers the summary prompts
/// instruct the model to wrap its reply in.
pub fn trim_summary_markers(reply: &str) -> String {
    let trimmed = reply.trim();
    let trimmed = trimmed.strip_prefix("<summary>").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("</summary>").unwrap_or(trimmed);
    trimmed.trim().to_string()
}

/// Sends a document's concatenated text through the extraction prompt
/// and validates the JSON reply against a declared schema.
pub struct StructuredExtractor<'a> {
    client: &'a dyn ModelClient,
    params: ModelParams,
    max_context_chars: usize,
}

impl<'a> StructuredExtractor<'a> {
    pub fn new(client: &'a dyn ModelClient, params: ModelParams, max_context_chars: usize) -> Self {
        Self {
            client,
            params,
            max_context_chars,
        }
    }

    pub async fn extract(
        &self,
        segments: &[TextSegment],
        schema: &ExtractionSchema,
    ) -> Result<StageResult, StageError> {
        let text = concat_segments(segments, self.max_context_chars);
        let prompt = prompts::build_extraction_prompt(&schema.format_instructions(), &text);
        debug!(schema = %schema.name, prompt_chars = prompt.len(), "invoking extraction");
        let reply = self.client.invoke(&prompt, &self.params).await?;
        parse_structured_reply(&reply, schema)
    }
}

/// Sends evidence text plus context fields through a summary prompt and
/// returns the free-text reply with delimiter markers trimmed.
pub struct SummaryStage<'a> {
    client: &'a dyn ModelClient,
    params: ModelParams,
    max_context_chars: usize,
}

impl<'a> SummaryStage<'a> {
    pub fn new(client: &'a dyn ModelClient, params: ModelParams, max_context_chars: usize) -> Self {
        Self {
            client,
            params,
            max_context_chars,
        }
    }

    /// Runs the summary stage. `render` receives the concatenated
    /// evidence text and returns the full prompt; an empty evidence list
    /// is valid and yields the placeholder text instead.
    pub async fn summarize<F>(
        &self,
        segments: &[TextSegment],
        render: F,
    ) -> Result<String, StageError>
    where
        F: FnOnce(&str) -> String,
    {
        let mut text = concat_segments(segments, self.max_context_chars);
        if text.trim().is_empty() {
            text = NO_EVIDENCE_PLACEHOLDER.to_string();
        }
        let prompt = render(&text);
        debug!(prompt_chars = prompt.len(), "invoking summarization");
        let reply = self.client.invoke(&prompt, &self.params).await?;
        Ok(trim_summary_markers(&reply))
    }
}

/// Sends a prior stage's summary through a tag prompt and validates the
/// JSON reply, exactly as the extractor does. The distinguishing
/// property is its input: the output of a prior stage rather than raw
/// source documents.
pub struct TagStage<'a> {
    client: &'a dyn ModelClient,
    params: ModelParams,
}

impl<'a> TagStage<'a> {
    pub fn new(client: &'a dyn ModelClient, params: ModelParams) -> Self {
        Self { client, params }
    }

    /// Runs the tag stage. `render` receives the summary text and
    /// returns the full prompt.
    pub async fn tag<F>(
        &self,
        summary: &str,
        schema: &ExtractionSchema,
        render: F,
    ) -> Result<StageResult, StageError>
    where
        F: FnOnce(&str) -> String,
    {
        let prompt = render(summary);
        debug!(schema = %schema.name, prompt_chars = prompt.len(), "invoking tagging");
        let reply = self.client.invoke(&prompt, &self.params).await?;
        parse_structured_reply(&reply, schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::error::LlmError;
    use crate::schema::FieldSpec;

    /// Stub model returning a fixed reply.
    struct FixedReply(String);

    #[async_trait]
    impl ModelClient for FixedReply {
        async fn invoke(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Stub model that always fails.
    struct AlwaysFails;

    #[async_trait]
    impl ModelClient for AlwaysFails {
        async fn invoke(&self, _prompt: &str, _params: &ModelParams) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    fn params() -> ModelParams {
        ModelParams::new("test-model", 256, 0.0)
    }

    fn title_schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "title_only",
            "1",
            vec![
                FieldSpec::text("short_title", "Short Title", "The short title."),
                FieldSpec::text("description", "Description", "A description."),
            ],
        )
    }

    fn segment(text: &str) -> TextSegment {
        TextSegment::new(text, "doc.pdf", 0)
    }

    #[test]
    fn concat_joins_in_order_and_truncates() {
        let segments = vec![segment("alpha"), segment("beta")];
        assert_eq!(concat_segments(&segments, 1000), "alpha\n\nbeta");
        assert_eq!(concat_segments(&segments, 5), "alpha");
    }

    #[test]
    fn summary_markers_are_trimmed() {
        assert_eq!(
            trim_summary_markers("<summary>\nThe work.\n</summary>"),
            "The work."
        );
        assert_eq!(trim_summary_markers("  plain text  "), "plain text");
    }

    #[test]
    fn structured_reply_tolerates_code_fences() {
        let reply = "Here you go:\n```json\n{\"short_title\": \"X\", \"description\": \"Y\"}\n```";
        let result = parse_structured_reply(reply, &title_schema()).expect("parses");
        assert_eq!(result.text("short_title"), Some("X"));
    }

    #[test]
    fn structured_reply_without_json_is_malformed() {
        let err = parse_structured_reply("I cannot answer that.", &title_schema()).unwrap_err();
        assert!(matches!(err, StageError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn extractor_rejects_missing_fields() {
        let client = FixedReply("{\"short_title\": \"X\"}".to_string());
        let extractor = StructuredExtractor::new(&client, params(), 10_000);
        let err = extractor
            .extract(&[segment("some document text")], &title_schema())
            .await
            .unwrap_err();
        match err {
            StageError::MissingFields { fields, .. } => {
                assert_eq!(fields, vec!["description".to_string()]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extractor_accepts_complete_reply() {
        let client = FixedReply("{\"short_title\": \"X\", \"description\": \"Y\"}".to_string());
        let extractor = StructuredExtractor::new(&client, params(), 10_000);
        let result = extractor
            .extract(&[segment("text")], &title_schema())
            .await
            .expect("extracts");
        assert_eq!(result.text("description"), Some("Y"));
    }

    #[tokio::test]
    async fn empty_evidence_still_summarizes() {
        let client = FixedReply("<summary>Nothing to report.</summary>".to_string());
        let stage = SummaryStage::new(&client, params(), 10_000);
        let mut seen_placeholder = false;
        let summary = stage
            .summarize(&[], |text| {
                seen_placeholder = text.contains(NO_EVIDENCE_PLACEHOLDER);
                format!("PROMPT {text}")
            })
            .await
            .expect("summarizes");
        assert!(seen_placeholder);
        assert_eq!(summary, "Nothing to report.");
    }

    #[tokio::test]
    async fn provider_errors_propagate_from_summary() {
        let stage = SummaryStage::new(&AlwaysFails, params(), 10_000);
        let err = stage
            .summarize(&[segment("evidence")], |text| text.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Model(LlmError::Api { .. })));
    }

    #[tokio::test]
    async fn tag_stage_validates_like_extractor() {
        let client = FixedReply("{\"short_title\": \"X\", \"description\": \"Y\"}".to_string());
        let stage = TagStage::new(&client, params());
        let result = stage
            .tag("a summary", &title_schema(), |summary| {
                format!("TAG {summary}")
            })
            .await
            .expect("tags");
        assert_eq!(result.len(), 2);
    }
}
