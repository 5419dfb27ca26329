use std::env;
use std::path::PathBuf;

use supporthub_chat::{query_for_category, AnswerComposer, ChatModel, ChatService, KnowledgeBase};
use supporthub_core::config::Config;
use supporthub_embed::get_default_embedder;

fn parse_args() -> (Option<String>, Option<String>, bool) {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut question = None;
    let mut category = None;
    let mut sms = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--sms" => sms = true,
            "--category" => {
                if i + 1 < args.len() {
                    category = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --category requires a label");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => question = Some(args[i].clone()),
            _ => {}
        }
        i += 1;
    }
    (question, category, sms)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let (question, category, sms) = parse_args();
    let question = match (question, category) {
        (Some(q), _) => q,
        (None, Some(label)) => query_for_category(&label)?.to_string(),
        (None, None) => {
            eprintln!("Usage: supporthub-ask '<question>' [--sms]");
            eprintln!("       supporthub-ask --category 'Fee Structure'");
            std::process::exit(1);
        }
    };

    let config = Config::load()?;
    let data_dir = PathBuf::from(
        config.get::<String>("data.docs_dir").unwrap_or_else(|_| "data/docs".to_string()),
    );
    let store_dir = PathBuf::from(
        config.get::<String>("data.vector_store_dir").unwrap_or_else(|_| "vector_store".to_string()),
    );

    let embedder = get_default_embedder()?;
    let kb = KnowledgeBase::new(data_dir, store_dir, embedder)?;
    let llm = ChatModel::from_env()?;
    let service = ChatService::new(kb, AnswerComposer::new(Box::new(llm)));

    if sms {
        match service.get_response_for_sms(&question) {
            Ok(text) => println!("{}", text),
            Err(e) => fail_generic(&e),
        }
    } else {
        match service.get_response(&question) {
            Ok(answer) => {
                println!("{}", answer.response);
                if !answer.sources.is_empty() {
                    println!("\nSources: {}", answer.sources.join(", "));
                }
            }
            Err(e) => fail_generic(&e),
        }
    }
    Ok(())
}

// Request boundary: keep provider detail in the logs, never in the reply.
fn fail_generic(err: &anyhow::Error) -> ! {
    tracing::error!("chat turn failed: {err:#}");
    eprintln!("Sorry, something went wrong while answering your question. Please try again later.");
    std::process::exit(1);
}
