//! supporthub-ingest
//!
//! Document loading and chunking: walks a data directory, extracts plain
//! text from PDF/DOCX/TXT files and splits it into overlapping segments
//! ready for embedding.

pub mod chunker;
pub mod loader;

pub use chunker::{ChunkingConfig, TextChunker};
pub use loader::DocumentLoader;
