use std::env;
use std::path::PathBuf;

use supporthub_chat::KnowledgeBase;
use supporthub_core::config::Config;
use supporthub_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--limit N]", args[0]);
        eprintln!("Example: {} 'fee structure' --limit 5", args[0]);
        std::process::exit(1);
    }
    let query_text = &args[1];
    let mut limit = 5usize;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(l) = args[i + 1].parse::<usize>() {
                        limit = l;
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
            _ => {}
        }
        i += 1;
    }

    let config = Config::load()?;
    let data_dir = PathBuf::from(
        config.get::<String>("data.docs_dir").unwrap_or_else(|_| "data/docs".to_string()),
    );
    let store_dir = PathBuf::from(
        config.get::<String>("data.vector_store_dir").unwrap_or_else(|_| "vector_store".to_string()),
    );

    println!("Support Hub Search\n==================");
    println!("Query: {}", query_text);

    let embedder = get_default_embedder()?;
    let kb = KnowledgeBase::new(data_dir, store_dir, embedder)?;
    let results = kb.query(query_text, limit)?;

    println!("\nFound {} results for: \"{}\"", results.len(), query_text);
    for (i, result) in results.iter().enumerate() {
        println!("\n  {}. distance={:.4}  source={}", i + 1, result.score, result.source);
        println!("     {}", result.content);
    }
    Ok(())
}
