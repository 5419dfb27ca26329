//! Domain types shared by the ingest, index and chat layers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single ingested file: its extracted text plus where it came from.
///
/// Produced once per file by the loader, immutable afterwards. `source` is
/// the original path; consumers that surface it to users strip it down to
/// the basename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source: PathBuf,
}

/// A bounded-length segment of a [`Document`], the unit that gets embedded
/// and indexed.
///
/// `chunk_index`/`total_chunks` record the position within the parent
/// document. `source` is carried over from the parent unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub source: PathBuf,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One nearest-neighbor hit for a query.
///
/// `source` is the basename of the originating file. `score` is the raw
/// vector distance: lower means more similar, and results are always
/// ordered by non-decreasing score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    pub source: String,
    pub score: f32,
}

/// A composed chat answer.
///
/// `sources` is deduplicated first-seen-wins in retrieval order, so
/// citation order is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub response: String,
    pub sources: Vec<String>,
}
