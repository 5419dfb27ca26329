//! supporthub-vector
//!
//! LanceDB-backed storage for embedded chunks: build a table from chunks
//! plus their vectors, reopen a persisted table, and run nearest-neighbor
//! queries over it. The on-disk layout is the provider's; the rest of the
//! system treats it as exists / does not exist / fails to load.

pub mod schema;
pub mod search;
pub mod writer;

pub use search::VectorSearchEngine;
pub use writer::ChunkIndexer;

/// Table name shared by the indexer and every reader of the store.
pub const DEFAULT_TABLE: &str = "chunks";
