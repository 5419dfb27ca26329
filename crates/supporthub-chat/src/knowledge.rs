//! Knowledge-base facade: load-or-build lifecycle plus per-query search.
//!
//! The index handle lives behind a mutex and `get_or_build` is the only
//! way in. The lock is held across a build, so concurrent first queries
//! wait for the first builder instead of re-triggering it.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use supporthub_core::traits::Embedder;
use supporthub_core::types::RetrievalResult;
use supporthub_core::Error;
use supporthub_ingest::{DocumentLoader, TextChunker};
use supporthub_vector::{ChunkIndexer, VectorSearchEngine, DEFAULT_TABLE};

pub struct KnowledgeBase {
    data_dir: PathBuf,
    store_dir: PathBuf,
    table_name: String,
    embedder: Box<dyn Embedder>,
    runtime: tokio::runtime::Runtime,
    engine: Mutex<Option<Arc<VectorSearchEngine>>>,
}

impl KnowledgeBase {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        store_dir: impl Into<PathBuf>,
        embedder: Box<dyn Embedder>,
    ) -> Result<Self> {
        Ok(Self {
            data_dir: data_dir.into(),
            store_dir: store_dir.into(),
            table_name: DEFAULT_TABLE.to_string(),
            embedder,
            runtime: tokio::runtime::Runtime::new()?,
            engine: Mutex::new(None),
        })
    }

    /// Reuse the in-process handle, else load the persisted table, else
    /// fall back to a full build from the data directory.
    pub fn get_or_build(&self) -> Result<Arc<VectorSearchEngine>> {
        let mut guard = self
            .engine
            .lock()
            .map_err(|_| anyhow::anyhow!("index handle lock poisoned"))?;
        if let Some(engine) = guard.as_ref() {
            return Ok(engine.clone());
        }
        let engine = match self
            .runtime
            .block_on(VectorSearchEngine::open(&self.store_dir, &self.table_name))
        {
            Ok(engine) => {
                info!("loaded existing vector store from {}", self.store_dir.display());
                engine
            }
            Err(e) => {
                warn!("{e}; falling back to a full rebuild");
                self.build_index()?
            }
        };
        let engine = Arc::new(engine);
        *guard = Some(engine.clone());
        Ok(engine)
    }

    /// Force a fresh build regardless of what is on disk.
    pub fn rebuild(&self) -> Result<Arc<VectorSearchEngine>> {
        let mut guard = self
            .engine
            .lock()
            .map_err(|_| anyhow::anyhow!("index handle lock poisoned"))?;
        let engine = Arc::new(self.build_index()?);
        *guard = Some(engine.clone());
        Ok(engine)
    }

    /// Top-k chunks for a free-text query, most similar first.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievalResult>> {
        let engine = self.get_or_build()?;
        let query_vec = self.embedder.embed_batch(&[text.to_string()])?.remove(0);
        self.runtime.block_on(engine.search_vector(&query_vec, k))
    }

    fn build_index(&self) -> Result<VectorSearchEngine> {
        info!("building vector store from {}", self.data_dir.display());
        let documents = DocumentLoader::new(&self.data_dir).load()?;
        if documents.is_empty() {
            return Err(Error::EmptyCorpus.into());
        }
        let chunks = TextChunker::new().split_documents(&documents);
        info!("split {} documents into {} chunks", documents.len(), chunks.len());
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if self.store_dir.exists() {
            fs::remove_dir_all(&self.store_dir)?;
        }
        fs::create_dir_all(&self.store_dir)?;
        self.runtime.block_on(async {
            let indexer = ChunkIndexer::new(&self.store_dir, &self.table_name).await?;
            indexer.build(&chunks, &embeddings).await
        })?;
        info!("vector store saved to {}", self.store_dir.display());
        Ok(self
            .runtime
            .block_on(VectorSearchEngine::open(&self.store_dir, &self.table_name))?)
    }
}
