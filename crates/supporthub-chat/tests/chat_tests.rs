use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use supporthub_chat::compose::{render_sms, AnswerComposer, EMPTY_CONTEXT};
use supporthub_chat::quick_access::query_for_category;
use supporthub_chat::{ChatService, KnowledgeBase};
use supporthub_core::traits::{Embedder, Generator};
use supporthub_core::types::{Answer, RetrievalResult};
use supporthub_embed::{FakeEmbedder, EMBEDDING_DIM};

struct CannedGenerator(String);

impl Generator for CannedGenerator {
    fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

struct CaptureGenerator {
    seen: Arc<Mutex<Vec<String>>>,
}

impl Generator for CaptureGenerator {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.seen.lock().expect("lock").push(prompt.to_string());
        Ok("ok".to_string())
    }
}

struct CountingEmbedder {
    inner: FakeEmbedder,
    calls: Arc<AtomicUsize>,
}

impl Embedder for CountingEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }
}

fn result(source: &str, content: &str) -> RetrievalResult {
    RetrievalResult { content: content.to_string(), source: source.to_string(), score: 0.1 }
}

#[test]
fn compose_falls_back_to_literal_context_when_empty() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let composer = AnswerComposer::new(Box::new(CaptureGenerator { seen: seen.clone() }));
    let answer = composer.compose("What are the hostel rules?", &[]).expect("compose");
    assert!(answer.sources.is_empty());
    let prompts = seen.lock().expect("lock");
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(EMPTY_CONTEXT));
    assert!(prompts[0].contains("What are the hostel rules?"));
}

#[test]
fn compose_labels_context_blocks_with_sources() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let composer = AnswerComposer::new(Box::new(CaptureGenerator { seen: seen.clone() }));
    let results = vec![
        result("fees.txt", "Fees are due in July."),
        result("hostel.txt", "Hostel fees are separate."),
    ];
    composer.compose("When are fees due?", &results).expect("compose");
    let prompts = seen.lock().expect("lock");
    assert!(prompts[0].contains("Source: fees.txt\nContent: Fees are due in July."));
    assert!(prompts[0].contains("Source: hostel.txt\nContent: Hostel fees are separate."));
}

#[test]
fn compose_dedups_sources_first_seen_wins() {
    let composer = AnswerComposer::new(Box::new(CannedGenerator("answer".to_string())));
    let results = vec![
        result("b.txt", "one"),
        result("a.txt", "two"),
        result("b.txt", "three"),
    ];
    let answer = composer.compose("q", &results).expect("compose");
    assert_eq!(answer.sources, vec!["b.txt".to_string(), "a.txt".to_string()]);
}

#[test]
fn sms_truncates_long_responses_with_marker() {
    let answer = Answer { response: "x".repeat(2000), sources: vec![] };
    let text = render_sms(&answer);
    assert!(text.chars().count() <= 1500);
    assert!(text.ends_with("... [Response truncated due to length]"));
}

#[test]
fn sms_drops_sources_when_no_room() {
    let answer = Answer {
        response: "y".repeat(1490),
        sources: vec!["a.txt".into(), "b.txt".into(), "c.txt".into()],
    };
    let text = render_sms(&answer);
    assert_eq!(text, "y".repeat(1490), "suffix would overflow, so it is dropped");
}

#[test]
fn sms_appends_two_sources_and_others() {
    let answer = Answer {
        response: "z".repeat(1000),
        sources: vec!["a.txt".into(), "b.txt".into(), "c.txt".into()],
    };
    let text = render_sms(&answer);
    assert!(text.ends_with("\n\nSources: a.txt, b.txt and others"));
    assert!(text.chars().count() <= 1500);
}

#[test]
fn sms_two_sources_without_the_others_suffix() {
    let answer = Answer {
        response: "Fees are due in July.".to_string(),
        sources: vec!["a.txt".into(), "b.txt".into()],
    };
    let text = render_sms(&answer);
    assert!(text.ends_with("\n\nSources: a.txt, b.txt"));
    assert!(!text.contains("and others"));
}

#[test]
fn quick_access_maps_known_categories() {
    let q = query_for_category("Fee Structure").expect("known category");
    assert!(q.contains("fee structure"));
    assert!(query_for_category("Dining Menu").is_err());
}

#[test]
fn end_to_end_fee_structure_query() {
    let data = TempDir::new().expect("tmp");
    fs::write(data.path().join("fee.txt"), "The fee structure is published annually.").expect("write");
    let store = TempDir::new().expect("tmp");

    let kb = KnowledgeBase::new(
        data.path(),
        store.path().join("store"),
        Box::new(FakeEmbedder::new(EMBEDDING_DIM)),
    )
    .expect("knowledge base");

    let results = kb.query("What is the fee structure?", 3).expect("query");
    assert!(!results.is_empty());
    assert_eq!(results[0].source, "fee.txt");
    assert!(results[0].content.contains("The fee structure is published annually."));
}

#[test]
fn forced_rebuild_picks_up_new_documents() {
    let data = TempDir::new().expect("tmp");
    fs::write(data.path().join("fee.txt"), "The fee structure is published annually.").expect("write");
    let store = TempDir::new().expect("tmp");

    let kb = KnowledgeBase::new(
        data.path(),
        store.path().join("store"),
        Box::new(FakeEmbedder::new(EMBEDDING_DIM)),
    )
    .expect("knowledge base");
    assert_eq!(kb.query("fee structure", 5).expect("query").len(), 1);

    // The built index is stale with respect to new files until a forced
    // rebuild re-embeds the whole corpus.
    fs::write(data.path().join("hostel.txt"), "Hostel applications open in June.").expect("write");
    assert_eq!(kb.query("hostel applications", 5).expect("query").len(), 1);

    kb.rebuild().expect("rebuild");
    let results = kb.query("Hostel applications open in June.", 5).expect("query");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source, "hostel.txt", "new document is retrievable after rebuild");
}

#[test]
fn chat_service_cites_the_grounding_file() {
    let data = TempDir::new().expect("tmp");
    fs::write(data.path().join("fee.txt"), "The fee structure is published annually.").expect("write");
    let store = TempDir::new().expect("tmp");

    let kb = KnowledgeBase::new(
        data.path(),
        store.path().join("store"),
        Box::new(FakeEmbedder::new(EMBEDDING_DIM)),
    )
    .expect("knowledge base");
    let service = ChatService::new(
        kb,
        AnswerComposer::new(Box::new(CannedGenerator("Fees are published annually.".to_string()))),
    );

    let answer = service.get_response("What is the fee structure?").expect("response");
    assert_eq!(answer.response, "Fees are published annually.");
    assert_eq!(answer.sources, vec!["fee.txt".to_string()]);

    let sms = service.get_response_for_sms("What is the fee structure?").expect("sms");
    assert!(sms.starts_with("Fees are published annually."));
    assert!(sms.contains("Sources: fee.txt"));
}

#[test]
fn concurrent_first_queries_build_once() {
    let data = TempDir::new().expect("tmp");
    fs::write(data.path().join("fee.txt"), "The fee structure is published annually.").expect("write");
    let store = TempDir::new().expect("tmp");

    let calls = Arc::new(AtomicUsize::new(0));
    let embedder = CountingEmbedder { inner: FakeEmbedder::new(EMBEDDING_DIM), calls: calls.clone() };
    let kb = Arc::new(
        KnowledgeBase::new(data.path(), store.path().join("store"), Box::new(embedder))
            .expect("knowledge base"),
    );

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let kb = kb.clone();
            std::thread::spawn(move || kb.query("What is the fee structure?", 2).expect("query"))
        })
        .collect();
    for handle in handles {
        let results = handle.join().expect("join");
        assert!(!results.is_empty());
    }

    // One embed call for the corpus batch, one per query: a second build
    // would add another batch call.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
