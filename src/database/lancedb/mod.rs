// LanceDB vector database module
// Handles vector storage and cosine similarity search for document chunks


pub mod vector_store;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use vector_store::VectorStore;

/// The two document types this system indexes, each stored in its own
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Resume,
    Jd,
}

impl DocType {
    /// Name of the vector collection holding documents of this type
    #[inline]
    pub fn collection(self) -> &'static str {
        match self {
            DocType::Resume => "resumes",
            DocType::Jd => "job_descriptions",
        }
    }

    /// Short tag used in document ids and stored metadata
    #[inline]
    pub fn tag(self) -> &'static str {
        match self {
            DocType::Resume => "resume",
            DocType::Jd => "jd",
        }
    }
}

impl fmt::Display for DocType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Embedding record stored in LanceDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique identifier, `{doc_id}-{chunk_index}`
    pub id: String,
    /// The L2-normalized embedding vector
    pub vector: Vec<f32>,
    /// Metadata about the chunk this embedding represents
    pub metadata: ChunkMetadata,
}

/// Metadata stored alongside each chunk embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Source filename the document was ingested from
    pub source: String,
    /// Document type tag, `resume` or `jd`
    pub doc_type: String,
    /// Caller-assigned id of the owning document
    pub doc_id: String,
    /// Index of this chunk within the document (for ordering)
    pub chunk_index: u32,
    /// The chunk text
    pub content: String,
    /// Timestamp when this embedding was created
    pub created_at: String,
}

/// Document-level metadata shared by all chunks of one indexing call
#[derive(Debug, Clone)]
pub struct BaseMetadata {
    pub source: String,
    pub doc_type: DocType,
}

/// Result of a vector similarity search, ordered by ascending cosine distance
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

/// Deterministic record id for a chunk, unique within a collection because
/// document ids are unique and chunk indexes are gapless per document.
#[inline]
pub fn chunk_record_id(doc_id: &str, chunk_index: usize) -> String {
    format!("{}-{}", doc_id, chunk_index)
}
