//! Filesystem-backed document source.
//!
//! Layout expected under the data root:
//!
//! ```text
//! <root>/<project-id>/result.pdf      primary result document
//! <root>/<project-id>/**/*.pdf        evidence (recursive)
//! <root>/<project-id>/**/*.xlsx       evidence
//! <root>/<project-id>/**/*.pptx       evidence (discovered, not parseable)
//! ```
//!
//! PDF text is extracted with `pdf-extract`, spreadsheets with
//! `calamine`. PPTX files are discovered so their absence of a parser is
//! reported per item instead of being silently skipped: loading one
//! raises [`SourceError::Unsupported`] and the item fails at the load
//! stage while the run continues.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::SourceError;

use super::{DocumentSource, ProjectItem, TextSegment};

/// Name of the primary result document inside each project directory.
const PRIMARY_FILE: &str = "result.pdf";

/// Evidence file extensions picked up by discovery.
const EVIDENCE_EXTENSIONS: [&str; 3] = ["pdf", "xlsx", "pptx"];

/// Document source reading a directory tree with one subdirectory per
/// project.
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Paths of all evidence files for a project, sorted for stable order.
    pub fn evidence_paths(&self, id: &str) -> Result<Vec<PathBuf>, SourceError> {
        let dir = self.project_dir(id);
        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if path.file_name().is_some_and(|name| name == PRIMARY_FILE) {
                continue;
            }
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    EVIDENCE_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                });
            if matches {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Resolves a project's documents without extracting any text.
    ///
    /// Fails with [`SourceError::PrimaryMissing`] when `result.pdf` is
    /// absent.
    pub fn discover(&self, id: &str) -> Result<ProjectItem, SourceError> {
        let primary = self.project_dir(id).join(PRIMARY_FILE);
        if !primary.is_file() {
            return Err(SourceError::PrimaryMissing { id: id.to_string() });
        }
        Ok(ProjectItem {
            id: id.to_string(),
            primary,
            evidence: self.evidence_paths(id)?,
        })
    }
}

impl DocumentSource for FsDocumentSource {
    fn list_projects(&self) -> Result<Vec<String>, SourceError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn load_primary(&self, id: &str) -> Result<Vec<TextSegment>, SourceError> {
        let item = self.discover(id)?;
        extract_file(&item.primary)
    }

    fn load_evidence(&self, id: &str) -> Result<Vec<TextSegment>, SourceError> {
        let mut segments = Vec::new();
        for path in self.evidence_paths(id)? {
            segments.extend(extract_file(&path)?);
        }
        Ok(segments)
    }
}

/// Dispatches text extraction on file extension.
fn extract_file(path: &Path) -> Result<Vec<TextSegment>, SourceError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => extract_pdf(path),
        "xlsx" => extract_xlsx(path),
        _ => Err(SourceError::Unsupported {
            path: path.to_path_buf(),
        }),
    }
}

/// Extracts PDF text, splitting on form feeds into per-page segments
/// when the extractor emits them.
fn extract_pdf(path: &Path) -> Result<Vec<TextSegment>, SourceError> {
    let text = pdf_extract::extract_text(path).map_err(|e| SourceError::Extract {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), chars = text.len(), "extracted pdf text");

    let segments: Vec<TextSegment> = text
        .split('\u{c}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .enumerate()
        .map(|(page, page_text)| TextSegment::new(page_text, path, page))
        .collect();
    Ok(segments)
}

/// Extracts spreadsheet text, one segment per sheet, cells joined with
/// tabs and rows with newlines.
fn extract_xlsx(path: &Path) -> Result<Vec<TextSegment>, SourceError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| SourceError::Extract {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut segments = Vec::new();
    for (index, name) in workbook.sheet_names().into_iter().enumerate() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| SourceError::Extract {
                path: path.to_path_buf(),
                message: format!("sheet '{name}': {e}"),
            })?;
        let mut sheet_text = String::new();
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            let line = cells.join("\t");
            if !line.trim().is_empty() {
                sheet_text.push_str(line.trim_end());
                sheet_text.push('\n');
            }
        }
        if !sheet_text.trim().is_empty() {
            segments.push(TextSegment::new(sheet_text, path, index));
        }
    }
    Ok(segments)
}
