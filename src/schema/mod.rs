//! Extraction schemas and stage results.
//!
//! An [`ExtractionSchema`] declares the fields a structured stage expects
//! back from the model. It is used twice per call: once to render the
//! "format instructions" block embedded in the prompt, and once to
//! validate the parsed JSON reply into a [`StageResult`].
//!
//! Nested reply objects are flattened into dotted paths, so a field named
//! `geographic_location.geographic_focus` matches
//! `{"geographic_location": {"geographic_focus": ...}}`.
//!
//! Enumerated choice lists are advisory only: they are rendered into the
//! field description shown to the model but never enforced at validation
//! time. Only field presence is checked.

pub mod catalog;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::StageError;

/// Value shape of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string value.
    Text,
    /// A list of string values.
    TextList,
}

/// One declared field of an extraction schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name; dotted names address nested reply objects.
    pub name: String,
    /// Human-readable title rendered in the format instructions.
    pub title: String,
    /// Description shown to the model.
    pub description: String,
    pub kind: FieldKind,
    /// Advisory choice list appended to the description. Never enforced.
    pub choices: Vec<String>,
}

impl FieldSpec {
    /// Creates a single-string field.
    pub fn text(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            kind: FieldKind::Text,
            choices: Vec::new(),
        }
    }

    /// Creates a string-list field.
    pub fn text_list(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: FieldKind::TextList,
            ..Self::text(name, title, description)
        }
    }

    /// Attaches an advisory choice list to this field.
    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Full description including the rendered choice list, if any.
    fn rendered_description(&self) -> String {
        if self.choices.is_empty() {
            return self.description.clone();
        }
        let quoted: Vec<String> = self.choices.iter().map(|c| format!("'{c}'")).collect();
        let selector = match self.kind {
            FieldKind::Text => "Select only the choice that is relevant given the description.",
            FieldKind::TextList => {
                "Select only the choices that are relevant given the description."
            }
        };
        format!(
            "{} Choices are: {}. {}",
            self.description,
            quoted.join(", "),
            selector
        )
    }

    /// JSON-schema fragment for this field.
    fn leaf_json(&self) -> Value {
        match self.kind {
            FieldKind::Text => json!({
                "title": self.title,
                "description": self.rendered_description(),
                "type": "string",
            }),
            FieldKind::TextList => json!({
                "title": self.title,
                "description": self.rendered_description(),
                "type": "array",
                "items": {"type": "string"},
            }),
        }
    }
}

/// A named, versioned set of fields expected back from a structured stage.
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    pub name: String,
    pub version: String,
    pub fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    pub fn new(name: impl Into<String>, version: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            fields,
        }
    }

    /// Names of all declared fields, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Renders the format-instructions block embedded in prompts.
    ///
    /// The wording follows the structured-output-parser convention the
    /// models were originally steered with: a short instruction followed
    /// by the output schema in a fenced block.
    pub fn format_instructions(&self) -> String {
        let schema = self.schema_json();
        let rendered =
            serde_json::to_string_pretty(&schema).expect("schema JSON serializes");
        format!(
            "The output should be formatted as a JSON instance that conforms to the JSON \
             schema below.\n\nHere is the output schema:\n```\n{rendered}\n```"
        )
    }

    /// Builds the JSON-schema object rendered in the format instructions.
    ///
    /// Dotted field names become nested object properties.
    fn schema_json(&self) -> Value {
        let mut properties = Map::new();
        let mut required: Vec<Value> = Vec::new();

        for field in &self.fields {
            match field.name.split_once('.') {
                None => {
                    properties.insert(field.name.clone(), field.leaf_json());
                    required.push(Value::String(field.name.clone()));
                }
                Some((group, rest)) => {
                    let entry = properties.entry(group.to_string()).or_insert_with(|| {
                        json!({"type": "object", "properties": {}, "required": []})
                    });
                    if !required.iter().any(|r| r == group) {
                        required.push(Value::String(group.to_string()));
                    }
                    if let Some(props) = entry
                        .get_mut("properties")
                        .and_then(Value::as_object_mut)
                    {
                        props.insert(rest.to_string(), field.leaf_json());
                    }
                    if let Some(req) = entry.get_mut("required").and_then(Value::as_array_mut) {
                        req.push(Value::String(rest.to_string()));
                    }
                }
            }
        }

        json!({"properties": Value::Object(properties), "required": required})
    }

    /// Validates a parsed model reply against this schema.
    ///
    /// The reply must be a JSON object; nested objects are flattened into
    /// dotted paths. Every declared field must be present and non-null.
    /// Values are accepted as-is: enumerated fields are not checked
    /// against their choice lists.
    pub fn validate(&self, reply: &Value) -> Result<StageResult, StageError> {
        let Some(object) = reply.as_object() else {
            return Err(StageError::MalformedResponse {
                schema: self.name.clone(),
                reason: "expected a JSON object".to_string(),
                snippet: snippet(&reply.to_string()),
            });
        };

        let mut result = StageResult::default();
        flatten_into(&mut result, "", object);

        let missing: Vec<String> = self
            .field_names()
            .filter(|name| result.value(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(StageError::MissingFields {
                schema: self.name.clone(),
                fields: missing,
            });
        }

        Ok(result)
    }
}

/// A value produced by a stage for one schema field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Mapping from (flattened) field name to value, produced by one stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageResult(BTreeMap<String, FieldValue>);

impl StageResult {
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// The field value as a string, if it is a single string.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The field value as JSON, or `"Not provided"` when absent.
    pub fn json_or_default(&self, name: &str) -> Value {
        self.0
            .get(name)
            .map(Value::from)
            .unwrap_or_else(|| Value::String("Not provided".to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flattens a reply object into dotted paths.
///
/// Strings map to [`FieldValue::Text`]; arrays to [`FieldValue::List`]
/// with non-string elements stringified; numbers and booleans are
/// stringified. Nulls are dropped so the field counts as missing.
fn flatten_into(result: &mut StageResult, prefix: &str, object: &Map<String, Value>) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(result, &path, nested),
            Value::String(text) => result.insert(path, FieldValue::Text(text.clone())),
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                result.insert(path, FieldValue::List(items));
            }
            Value::Number(n) => result.insert(path, FieldValue::Text(n.to_string())),
            Value::Bool(b) => result.insert(path, FieldValue::Text(b.to_string())),
            Value::Null => {}
        }
    }
}

/// Truncates text for inclusion in error messages.
pub(crate) fn snippet(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    match text.char_indices().nth(MAX_CHARS) {
        Some((index, _)) => format!("{}…", &text[..index]),
        None => text.to_string(),
    }
}
