// Embeddings module
// Handles Ollama integration and document chunking

pub mod chunking;
pub mod ollama;

pub use chunking::{ChunkingConfig, TextChunk, chunk_text};
pub use ollama::{OllamaClient, l2_normalize};

/// Maps texts to fixed-length vectors, one vector per input text in input
/// order, each L2-normalized. The seam between the retrieval core and the
/// external embedding model: injected by reference wherever embeddings are
/// needed, stubbed in tests.
pub trait Embedder {
    /// Embed a batch of texts. Any failure aborts the whole batch; no
    /// partial results are returned and no retry is attempted.
    fn embed(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>>;
}
