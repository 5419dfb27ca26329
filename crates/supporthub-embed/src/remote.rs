//! OpenAI-compatible embeddings over blocking HTTP.
//!
//! `POST {base_url}/embeddings` with a batch of inputs. No retry and no
//! timeout policy beyond the client defaults; a non-success status maps to
//! `Error::Provider` with the body kept for logs.

use anyhow::Result;
use serde::Deserialize;

use supporthub_core::traits::Embedder;
use supporthub_core::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

pub struct RemoteEmbedder {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
    dim: usize,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
    index: usize,
}

impl RemoteEmbedder {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        dim: usize,
    ) -> supporthub_core::Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingConfig("embedding API key (OPENAI_API_KEY)".to_string()));
        }
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            base_url,
            model,
            api_key,
            dim,
        })
    }

    /// Resolve endpoint, model and key from the environment:
    /// `APP_EMBEDDING_BASE_URL` > default, `APP_EMBEDDING_MODEL` > default,
    /// key from `OPENAI_API_KEY`.
    pub fn from_env() -> supporthub_core::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let base_url = std::env::var("APP_EMBEDDING_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("APP_EMBEDDING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(base_url, model, api_key, crate::EMBEDDING_DIM)
    }
}

impl Embedder for RemoteEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({ "model": self.model, "input": texts });
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .map_err(|e| Error::Provider(format!("embedding request to {url} failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().unwrap_or_default();
            return Err(Error::Provider(format!("embedding service returned {status}: {detail}")).into());
        }
        let parsed: EmbeddingsResponse = resp
            .json()
            .map_err(|e| Error::Provider(format!("malformed embedding response: {e}")))?;
        let mut rows = parsed.data;
        rows.sort_by_key(|r| r.index);
        if rows.len() != texts.len() {
            return Err(Error::Provider(format!(
                "embedding service returned {} vectors for {} inputs",
                rows.len(),
                texts.len()
            ))
            .into());
        }
        for row in &rows {
            if row.embedding.len() != self.dim {
                return Err(Error::Provider(format!(
                    "embedding dimension mismatch: got {} expected {}",
                    row.embedding.len(),
                    self.dim
                ))
                .into());
            }
        }
        Ok(rows.into_iter().map(|r| r.embedding).collect())
    }
}
