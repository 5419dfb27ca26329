//! Overlapping fixed-size text splitting.
//!
//! Boundaries prefer paragraph, newline, sentence, then word breaks in the
//! back half of the window before falling back to a raw character cut.
//! The next chunk starts exactly `overlap` characters before the previous
//! end, so consecutive chunks of the same document share that many
//! characters verbatim. All sizes are counted in chars, not bytes.

use supporthub_core::types::{Document, DocumentChunk};

const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 1000, overlap: 200 }
    }
}

#[derive(Default)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChunkingConfig) -> Self {
        // The cut floor sits at half the window, so the overlap must fit
        // below it or the window could stop advancing.
        assert!(
            config.overlap * 2 <= config.max_chars,
            "overlap must be at most half of max_chars"
        );
        Self { config }
    }

    /// Split every document, propagating its source to each chunk.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<DocumentChunk> {
        let mut all_chunks = Vec::new();
        for doc in documents {
            let pieces = self.split_text(&doc.content);
            let total_chunks = pieces.len();
            for (chunk_index, content) in pieces.into_iter().enumerate() {
                all_chunks.push(DocumentChunk {
                    content,
                    source: doc.source.clone(),
                    chunk_index,
                    total_chunks,
                });
            }
        }
        all_chunks
    }

    pub fn split_text(&self, content: &str) -> Vec<String> {
        let chars: Vec<char> = content.chars().collect();
        if chars.len() <= self.config.max_chars {
            return vec![content.to_string()];
        }
        let mut chunks = Vec::new();
        let mut start = 0usize;
        loop {
            let window_end = (start + self.config.max_chars).min(chars.len());
            let end = if window_end == chars.len() {
                window_end
            } else {
                self.cut_point(&chars, start, window_end)
            };
            chunks.push(chars[start..end].iter().collect());
            if end >= chars.len() {
                break;
            }
            start = end - self.config.overlap;
        }
        chunks
    }

    fn cut_point(&self, chars: &[char], start: usize, window_end: usize) -> usize {
        let floor = start + (window_end - start) / 2;
        for sep in SEPARATORS {
            if let Some(end) = rfind_separator(chars, floor, window_end, sep) {
                return end;
            }
        }
        window_end
    }
}

/// Last occurrence of `sep` fully inside `[floor, window_end)`, returning
/// the index just past it.
fn rfind_separator(chars: &[char], floor: usize, window_end: usize, sep: &str) -> Option<usize> {
    let sep: Vec<char> = sep.chars().collect();
    let mut i = window_end.checked_sub(sep.len())?;
    while i >= floor {
        if chars[i..i + sep.len()] == sep[..] {
            return Some(i + sep.len());
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    None
}
