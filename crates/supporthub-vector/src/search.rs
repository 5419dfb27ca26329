//! Nearest-neighbor queries against a persisted table.

use anyhow::Result;
use futures::TryStreamExt;
use lancedb::connect;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::path::Path;

use arrow_array::{Float32Array, StringArray};

use supporthub_core::types::RetrievalResult;
use supporthub_core::Error;

pub struct VectorSearchEngine {
    table: lancedb::Table,
}

impl VectorSearchEngine {
    /// Open a previously persisted table.
    ///
    /// Every failure mode (missing directory, missing table, corrupt data)
    /// maps to [`Error::IndexLoad`] so the caller can fall back to a full
    /// rebuild. Index files are locally trusted; nothing here defends
    /// against adversarial input.
    pub async fn open(db_path: &Path, table_name: &str) -> supporthub_core::Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref())
            .execute()
            .await
            .map_err(|e| Error::IndexLoad(e.to_string()))?;
        let names = db
            .table_names()
            .execute()
            .await
            .map_err(|e| Error::IndexLoad(e.to_string()))?;
        if !names.contains(&table_name.to_string()) {
            return Err(Error::IndexLoad(format!(
                "table '{}' not found under {}",
                table_name,
                db_path.display()
            )));
        }
        let table = db
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| Error::IndexLoad(e.to_string()))?;
        Ok(Self { table })
    }

    /// Top-k chunks by ascending distance to the query vector.
    pub async fn search_vector(&self, query_vec: &[f32], k: usize) -> Result<Vec<RetrievalResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut stream = self.table.vector_search(query_vec.to_vec())?.limit(k).execute().await?;
        let mut results = Vec::new();
        while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
            let content_col = batch
                .column_by_name("content")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow::anyhow!("content column missing"))?;
            let source_col = batch
                .column_by_name("source")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow::anyhow!("source column missing"))?;
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| anyhow::anyhow!("_distance column missing"))?;
            for i in 0..batch.num_rows() {
                let source_path = source_col.value(i);
                let source = Path::new(source_path)
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| source_path.to_string());
                results.push(RetrievalResult {
                    content: content_col.value(i).to_string(),
                    source,
                    score: distance_col.value(i),
                });
            }
        }
        results.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);
        Ok(results)
    }
}
