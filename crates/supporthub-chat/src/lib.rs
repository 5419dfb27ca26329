//! supporthub-chat
//!
//! The question-answering layer: a knowledge-base facade over the ingest
//! and vector crates, the answer composer with its SMS rendering, the
//! language-model client and the quick-access category table. Channel
//! adapters (web, SMS webhook, voice) call [`ChatService`] and render the
//! [`Answer`] themselves.

pub mod compose;
pub mod generate;
pub mod knowledge;
pub mod quick_access;

pub use compose::{render_sms, AnswerComposer};
pub use generate::ChatModel;
pub use knowledge::KnowledgeBase;
pub use quick_access::query_for_category;

use anyhow::Result;
use supporthub_core::types::Answer;

/// How many chunks ground one chat turn.
pub const RETRIEVAL_K: usize = 3;

pub struct ChatService {
    knowledge: KnowledgeBase,
    composer: AnswerComposer,
}

impl ChatService {
    pub fn new(knowledge: KnowledgeBase, composer: AnswerComposer) -> Self {
        Self { knowledge, composer }
    }

    /// Retrieve grounding chunks and compose an answer for one user turn.
    pub fn get_response(&self, query: &str) -> Result<Answer> {
        let results = self.knowledge.query(query, RETRIEVAL_K)?;
        self.composer.compose(query, &results)
    }

    /// Same turn, rendered within the SMS length budget.
    pub fn get_response_for_sms(&self, query: &str) -> Result<String> {
        let results = self.knowledge.query(query, RETRIEVAL_K)?;
        self.composer.compose_for_sms(query, &results)
    }
}
