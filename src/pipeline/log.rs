//! Append-only JSONL result log.
//!
//! One JSON object per line, written as a single newline-terminated
//! append so records never interleave. The log is the pipeline's only
//! durable state: the runner re-reads it at startup to skip items that
//! already have a record. Records carry no schema-version field.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::error::PipelineError;

/// Field every record carries; the idempotence scan keys on it.
const ID_FIELD: &str = "result_id";

/// File-backed append-only record log.
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single newline-terminated line.
    pub fn append(&self, record: &Value) -> Result<(), PipelineError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Identifiers already present in the log.
    ///
    /// Scans every line; lines that fail to parse or lack the identifier
    /// field are skipped with a warning so one corrupt line cannot block
    /// the run.
    pub fn logged_ids(&self) -> Result<HashSet<String>, PipelineError> {
        let mut ids = HashSet::new();
        if !self.path.exists() {
            return Ok(ids);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(record) => match record.get(ID_FIELD).and_then(Value::as_str) {
                    Some(id) => {
                        ids.insert(id.to_string());
                    }
                    None => warn!(
                        line = number + 1,
                        "result log record has no '{ID_FIELD}' field, skipping"
                    ),
                },
                Err(e) => warn!(line = number + 1, error = %e, "unparseable result log line, skipping"),
            }
        }
        Ok(ids)
    }
}
