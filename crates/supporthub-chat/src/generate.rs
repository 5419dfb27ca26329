//! OpenAI-compatible chat completions over blocking HTTP.
//!
//! Synchronous, no streaming, no automatic retry. A non-success status
//! maps to `Error::Provider` with the body kept for logs; the request
//! boundary surfaces a generic message instead.

use anyhow::Result;
use serde::Deserialize;

use supporthub_core::traits::Generator;
use supporthub_core::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
const TEMPERATURE: f32 = 0.7;

pub struct ChatModel {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatModel {
    pub fn new(base_url: String, model: String, api_key: String) -> supporthub_core::Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingConfig("chat API key (OPENAI_API_KEY)".to_string()));
        }
        Ok(Self { client: reqwest::blocking::Client::new(), base_url, model, api_key })
    }

    /// Resolve endpoint, model and key from the environment:
    /// `APP_CHAT_BASE_URL` > default, `APP_CHAT_MODEL` > default, key from
    /// `OPENAI_API_KEY`.
    pub fn from_env() -> supporthub_core::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let base_url =
            std::env::var("APP_CHAT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("APP_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(base_url, model, api_key)
    }
}

impl Generator for ChatModel {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .map_err(|e| Error::Provider(format!("chat request to {url} failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().unwrap_or_default();
            return Err(Error::Provider(format!("chat service returned {status}: {detail}")).into());
        }
        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| Error::Provider(format!("malformed chat response: {e}")))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider("chat response contained no choices".to_string()))?;
        Ok(choice.message.content)
    }
}
