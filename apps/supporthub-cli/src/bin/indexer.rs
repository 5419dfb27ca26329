use std::{env, fs, path::PathBuf};

use supporthub_core::config::Config;
use supporthub_embed::get_default_embedder;
use supporthub_ingest::{DocumentLoader, TextChunker};
use supporthub_vector::ChunkIndexer;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir = None;
    let mut limit = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        limit = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => data_dir = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }
    let data_dir = data_dir.unwrap_or_else(|| {
        let dir: String = config.get("data.docs_dir").unwrap_or_else(|_| "data/docs".to_string());
        PathBuf::from(dir)
    });
    let store_dir = PathBuf::from(
        config.get::<String>("data.vector_store_dir").unwrap_or_else(|_| "vector_store".to_string()),
    );

    println!("Support Hub Indexer\n===================");
    println!("Data directory: {}", data_dir.display());
    println!("Vector store: {}", store_dir.display());

    let loader = DocumentLoader::new(&data_dir);
    let documents = match limit {
        Some(n) => {
            println!("Limiting to first {} files", n);
            loader.load_limited(n)?
        }
        None => loader.load()?,
    };
    if documents.is_empty() {
        return Err(supporthub_core::Error::EmptyCorpus.into());
    }
    println!("Loaded {} documents", documents.len());

    let chunks = TextChunker::new().split_documents(&documents);
    println!("Split into {} chunks", chunks.len());

    let embedder = get_default_embedder()?;
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts)?;

    if store_dir.exists() {
        fs::remove_dir_all(&store_dir)?;
    }
    fs::create_dir_all(&store_dir)?;
    tokio::runtime::Runtime::new()?.block_on(async {
        let indexer = ChunkIndexer::new(&store_dir, supporthub_vector::DEFAULT_TABLE).await?;
        indexer.build(&chunks, &embeddings).await
    })?;

    println!("\nIndexing completed successfully!");
    println!("{} documents, {} chunks", documents.len(), chunks.len());
    println!("\nTo search the store, use: cargo run --bin supporthub-search '<query>'");
    println!("To ask a question, use: cargo run --bin supporthub-ask '<question>'");
    Ok(())
}
