//! Directory walker and per-format text extraction.
//!
//! One [`Document`] per regular file with a recognized extension. Files
//! that fail extraction are skipped with a warning; unrecognized
//! extensions are skipped silently. Re-invocation re-walks from scratch.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use supporthub_core::types::Document;
use supporthub_core::Error;

pub struct DocumentLoader {
    root: PathBuf,
}

impl DocumentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk the data directory and extract one Document per readable file.
    pub fn load(&self) -> Result<Vec<Document>> {
        self.load_paths(self.list_files())
    }

    /// Same walk, capped at the first `limit` files.
    pub fn load_limited(&self, limit: usize) -> Result<Vec<Document>> {
        let mut files = self.list_files();
        if files.len() > limit {
            files.truncate(limit);
            debug!("limited to first {} files", limit);
        }
        self.load_paths(files)
    }

    fn load_paths(&self, paths: Vec<PathBuf>) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for path in paths {
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            let extracted = match ext.as_str() {
                "pdf" => extract_pdf(&path),
                "docx" => extract_docx(&path),
                "txt" => read_text(&path),
                _ => continue,
            };
            match extracted {
                Ok(text) if !text.trim().is_empty() => {
                    documents.push(Document { content: text, source: path });
                }
                Ok(_) => {
                    debug!("no text extracted from {}, skipping", path.display());
                }
                Err(e) => {
                    let err = Error::Extraction { path: path.clone(), reason: e.to_string() };
                    warn!("{err}, skipping");
                }
            }
        }
        debug!("loaded {} documents from {}", documents.len(), self.root.display());
        Ok(documents)
    }

    fn list_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            files.push(entry.path().to_path_buf());
        }
        files.sort();
        files
    }
}

/// Per-page text joined with newline separators.
fn extract_pdf(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path)?;
    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        text.push_str(&doc.extract_text(&[*page_number])?);
        text.push('\n');
    }
    Ok(text)
}

/// Paragraph text first, then table rows rendered as pipe-delimited cells.
fn extract_docx(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| anyhow::anyhow!("invalid docx: {e:?}"))?;
    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(t) => {
                for row in &t.rows {
                    let TableChild::TableRow(row) = row;
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|TableRowChild::TableCell(cell)| cell_text(cell).trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    if !cells.is_empty() {
                        lines.push(cells.join(" | "));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    out.push_str(&t.text);
                }
            }
        }
    }
    out
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        if let TableCellContent::Paragraph(p) = content {
            parts.push(paragraph_text(p));
        }
    }
    parts.join("\n")
}

/// UTF-8 read with a lossy fallback for undecodable bytes.
fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}
