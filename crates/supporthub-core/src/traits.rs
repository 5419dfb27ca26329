/// Computes dense vector embeddings for batches of text.
///
/// Implementations must return one L2-comparable vector of `dim()` floats
/// per input, in input order. Calls are synchronous and may block on the
/// network; callers own any timeout wrapping.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Produces free text from a prompt via a language model.
///
/// Synchronous, no streaming, no automatic retry.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
