//! Prompt assembly, answer composition and the SMS rendering budget.

use anyhow::Result;

use supporthub_core::traits::Generator;
use supporthub_core::types::{Answer, RetrievalResult};

/// Literal context block used when retrieval comes back empty.
pub const EMPTY_CONTEXT: &str = "No specific information found in the knowledge base.";

const PROMPT_TEMPLATE: &str = "You are a helpful assistant for the University Support Hub. \
You provide accurate information about the university's courses, admissions, facilities, \
faculty, research, exams, fees, scholarships and student life.

When answering:
- Be concise but thorough.
- Provide factual information from the knowledge base.
- If you don't know the answer, say so politely and suggest contacting the university directly.
- Do not make up information.
- Maintain a professional, friendly tone.
- Address the user respectfully.
- Format important information in a structured way with bullet points or numbered lists when appropriate.

Here is relevant information from the university knowledge base to help answer the query:
{context}

Question: {question}";

pub struct AnswerComposer {
    llm: Box<dyn Generator>,
}

impl AnswerComposer {
    pub fn new(llm: Box<dyn Generator>) -> Self {
        Self { llm }
    }

    /// Format retrieved context plus the query into the instructional
    /// template and delegate to the language model.
    pub fn compose(&self, query: &str, results: &[RetrievalResult]) -> Result<Answer> {
        let context = if results.is_empty() {
            EMPTY_CONTEXT.to_string()
        } else {
            results
                .iter()
                .map(|r| format!("Source: {}\nContent: {}", r.source, r.content))
                .collect::<Vec<_>>()
                .join("\n\n")
        };
        let prompt = PROMPT_TEMPLATE
            .replace("{context}", &context)
            .replace("{question}", query);
        let response = self.llm.generate(&prompt)?;
        Ok(Answer { response, sources: dedup_sources(results) })
    }

    pub fn compose_for_sms(&self, query: &str, results: &[RetrievalResult]) -> Result<String> {
        Ok(render_sms(&self.compose(query, results)?))
    }
}

/// First-seen-wins source list, so citation order is deterministic.
fn dedup_sources(results: &[RetrievalResult]) -> Vec<String> {
    let mut sources = Vec::new();
    for r in results {
        if !sources.contains(&r.source) {
            sources.push(r.source.clone());
        }
    }
    sources
}

pub const SMS_MAX_LEN: usize = 1500;
const SMS_TRUNCATE_AT: usize = 1450;
const SMS_SOURCES_ROOM: usize = 1400;
const SMS_TRUNCATION_MARKER: &str = "... [Response truncated due to length]";

/// Render an answer within the SMS length budget.
///
/// Responses over [`SMS_MAX_LEN`] chars are cut at 1450 plus an explicit
/// truncation marker. Up to two source names follow only when the
/// response leaves room, and the ceiling is re-checked after
/// concatenation: an overflowing suffix is dropped entirely.
pub fn render_sms(answer: &Answer) -> String {
    let mut text = if answer.response.chars().count() > SMS_MAX_LEN {
        let cut: String = answer.response.chars().take(SMS_TRUNCATE_AT).collect();
        format!("{cut}{SMS_TRUNCATION_MARKER}")
    } else {
        answer.response.clone()
    };
    if !answer.sources.is_empty() && text.chars().count() < SMS_SOURCES_ROOM {
        let names: Vec<String> = answer.sources.iter().take(2).cloned().collect();
        let mut suffix = format!("\n\nSources: {}", names.join(", "));
        if answer.sources.len() > 2 {
            suffix.push_str(" and others");
        }
        if text.chars().count() + suffix.chars().count() <= SMS_MAX_LEN {
            text.push_str(&suffix);
        }
    }
    text
}
