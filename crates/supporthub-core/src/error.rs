use std::path::PathBuf;
use thiserror::Error;

/// Error kinds of the retrieval core.
///
/// Extraction failures are logged and swallowed at the loader; everything
/// else propagates to the request boundary, which surfaces a generic
/// message and keeps the detail for logs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to extract text from {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("no loadable documents found in the data directory")]
    EmptyCorpus,

    #[error("failed to load persisted index: {0}")]
    IndexLoad(String),

    #[error("provider call failed: {0}")]
    Provider(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
