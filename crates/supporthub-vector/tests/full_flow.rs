use std::path::PathBuf;
use tempfile::TempDir;

use supporthub_core::traits::Embedder;
use supporthub_core::types::DocumentChunk;
use supporthub_embed::{FakeEmbedder, EMBEDDING_DIM};
use supporthub_vector::{ChunkIndexer, VectorSearchEngine};

fn sample_chunks() -> Vec<DocumentChunk> {
    let texts = [
        "The fee structure is published annually.",
        "Hostel applications open in June.",
        "The central library is open from 9 am to 8 pm.",
        "Scholarships are awarded on merit each semester.",
        "Examination schedules are announced by the controller.",
    ];
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| DocumentChunk {
            content: (*t).to_string(),
            source: PathBuf::from(format!("/data/doc{i}.txt")),
            chunk_index: 0,
            total_chunks: 1,
        })
        .collect()
}

#[tokio::test]
async fn build_search_and_reopen_round_trip() -> anyhow::Result<()> {
    let embedder = FakeEmbedder::new(EMBEDDING_DIM);
    let chunks = sample_chunks();
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts)?;

    let tmp = TempDir::new()?;
    let indexer = ChunkIndexer::new(tmp.path(), "chunks").await?;
    indexer.build(&chunks, &embeddings).await?;

    let query_vec = embedder.embed_batch(&["What is the fee structure?".to_string()])?.remove(0);
    let engine = VectorSearchEngine::open(tmp.path(), "chunks").await?;
    let first = engine.search_vector(&query_vec, 3).await?;
    assert!(!first.is_empty());
    assert!(first.len() <= 3);
    for pair in first.windows(2) {
        assert!(pair[0].score <= pair[1].score, "distances are non-decreasing");
    }
    drop(engine);

    // Reopening the persisted table must reproduce ordering and scores
    let reopened = VectorSearchEngine::open(tmp.path(), "chunks").await?;
    let second = reopened.search_vector(&query_vec, 3).await?;
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.content, b.content);
        assert_eq!(a.source, b.source);
        assert!((a.score - b.score).abs() <= 1e-5, "score drift after reopen");
    }
    Ok(())
}

#[tokio::test]
async fn search_returns_at_most_k_and_strips_directories() -> anyhow::Result<()> {
    let embedder = FakeEmbedder::new(EMBEDDING_DIM);
    let chunks = sample_chunks();
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts)?;

    let tmp = TempDir::new()?;
    let indexer = ChunkIndexer::new(tmp.path(), "chunks").await?;
    indexer.build(&chunks, &embeddings).await?;

    let engine = VectorSearchEngine::open(tmp.path(), "chunks").await?;
    let query_vec = embedder.embed_batch(&["library hours".to_string()])?.remove(0);
    let results = engine.search_vector(&query_vec, 2).await?;
    assert!(results.len() <= 2);
    for r in &results {
        assert!(!r.source.contains('/'), "source is a basename: {}", r.source);
    }

    let none = engine.search_vector(&query_vec, 0).await?;
    assert!(none.is_empty());
    Ok(())
}

#[tokio::test]
async fn build_rejects_an_empty_corpus() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let indexer = ChunkIndexer::new(tmp.path(), "chunks").await?;
    let err = indexer.build(&[], &[]).await.expect_err("empty corpus is fatal");
    let kind = err.downcast_ref::<supporthub_core::Error>();
    assert!(matches!(kind, Some(supporthub_core::Error::EmptyCorpus)));
    Ok(())
}

#[tokio::test]
async fn open_missing_store_reports_index_load() {
    let tmp = TempDir::new().expect("tmp");
    let missing = tmp.path().join("never_built");
    let err = match VectorSearchEngine::open(&missing, "chunks").await {
        Ok(_) => panic!("opening a store that was never built must fail"),
        Err(e) => e,
    };
    assert!(matches!(err, supporthub_core::Error::IndexLoad(_)));
}
