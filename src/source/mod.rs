//! Project discovery and document text extraction.
//!
//! A [`DocumentSource`] hands the pipeline the text of a project's
//! primary result document and its supporting evidence files as ordered
//! [`TextSegment`]s. The shipped implementation, [`FsDocumentSource`],
//! reads a directory tree with one subdirectory per project; tests
//! substitute in-memory stubs.

pub mod fs;

use std::path::PathBuf;

use crate::error::SourceError;

pub use fs::FsDocumentSource;

/// One unit of extracted document text plus where it came from.
#[derive(Debug, Clone)]
pub struct TextSegment {
    pub text: String,
    /// File the text was extracted from.
    pub source: PathBuf,
    /// Zero-based page, slide or sheet index within the file.
    pub page: usize,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, source: impl Into<PathBuf>, page: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            page,
        }
    }
}

/// A discovered project: identifier, primary document, evidence files.
#[derive(Debug, Clone)]
pub struct ProjectItem {
    pub id: String,
    pub primary: PathBuf,
    pub evidence: Vec<PathBuf>,
}

/// Supplies project identifiers and document text to the pipeline.
///
/// `load_primary` must fail with [`SourceError::PrimaryMissing`] when the
/// primary result document is absent so the runner can report the item as
/// failed at the load stage.
pub trait DocumentSource: Send + Sync {
    /// All project identifiers under the source root, in stable order.
    fn list_projects(&self) -> Result<Vec<String>, SourceError>;

    /// Text of the primary result document, in page order.
    fn load_primary(&self, id: &str) -> Result<Vec<TextSegment>, SourceError>;

    /// Text of all evidence documents, in file-then-page order.
    ///
    /// An empty list is valid: projects may carry no evidence.
    fn load_evidence(&self, id: &str) -> Result<Vec<TextSegment>, SourceError>;
}
