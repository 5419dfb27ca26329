//! Table construction from chunks and their embeddings.
//!
//! A build writes every chunk; there is no incremental path. Callers that
//! want a clean rebuild remove the store directory first.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::{connect, Connection};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};

use crate::schema::{build_arrow_schema, EMBEDDING_DIM};
use supporthub_core::types::DocumentChunk;
use supporthub_core::Error;

pub struct ChunkIndexer {
    db: Connection,
    table_name: String,
}

impl ChunkIndexer {
    pub async fn new(db_path: &Path, table_name: &str) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self { db, table_name: table_name.to_string() })
    }

    /// Write all chunks with their embeddings into the table.
    pub async fn build(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus.into());
        }
        anyhow::ensure!(
            chunks.len() == embeddings.len(),
            "chunks and embeddings length must match ({} vs {})",
            chunks.len(),
            embeddings.len()
        );
        for e in embeddings {
            anyhow::ensure!(
                e.len() == EMBEDDING_DIM as usize,
                "embedding dimension mismatch: got {} expected {}",
                e.len(),
                EMBEDDING_DIM
            );
        }
        info!("indexing {} chunks into table '{}'", chunks.len(), self.table_name);
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")?
                .progress_chars("#>-"),
        );
        let batch_size = 1000usize;
        let mut written = 0usize;
        for (chunk_rows, emb_rows) in chunks.chunks(batch_size).zip(embeddings.chunks(batch_size)) {
            let record_batch = to_record_batch(chunk_rows, emb_rows)?;
            self.insert_batch(record_batch).await?;
            written += chunk_rows.len();
            pb.set_position(written as u64);
        }
        pb.finish_with_message("index build complete");
        info!("indexed {} chunks", written);
        Ok(())
    }

    async fn insert_batch(&self, record_batch: RecordBatch) -> Result<()> {
        let schema = record_batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
        if self.db.table_names().execute().await?.contains(&self.table_name) {
            self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
        } else {
            self.db.create_table(&self.table_name, reader).execute().await?;
        }
        Ok(())
    }
}

fn to_record_batch(chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<RecordBatch> {
    let schema = build_arrow_schema();
    let mut ids = Vec::new();
    let mut sources = Vec::new();
    let mut contents = Vec::new();
    let mut chunk_indices = Vec::new();
    let mut total_chunks = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
        ids.push(format!("{}:{}", chunk.source.display(), chunk.chunk_index));
        sources.push(chunk.source.to_string_lossy().to_string());
        contents.push(chunk.content.clone());
        chunk_indices.push(chunk.chunk_index as i32);
        total_chunks.push(chunk.total_chunks as i32);
        vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(StringArray::from(contents)),
            Arc::new(Int32Array::from(chunk_indices)),
            Arc::new(Int32Array::from(total_chunks)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                EMBEDDING_DIM,
            )),
        ],
    )?;
    Ok(record_batch)
}
