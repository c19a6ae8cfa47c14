// Indexer module
// The document pipeline: extract text, chunk it, embed, and store


use std::path::Path;

use tracing::info;
use uuid::Uuid;

use crate::Result;
use crate::config::Config;
use crate::database::lancedb::{BaseMetadata, DocType, VectorStore};
use crate::embeddings::chunking::chunk_text;
use crate::embeddings::ollama::OllamaClient;
use crate::extractor::extract_text;
use crate::matcher::{CandidateMatch, match_candidates};

/// Document pipeline holding the long-lived embedding client and vector
/// store. Constructed once at startup and shared by reference; there is no
/// process-global state.
pub struct Indexer {
    config: Config,
    vector_store: VectorStore,
    ollama: OllamaClient,
}

/// Outcome of indexing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDocument {
    pub doc_id: String,
    pub source: String,
    pub chunks_indexed: usize,
}

impl Indexer {
    #[inline]
    pub async fn new(config: Config) -> Result<Self> {
        let vector_store = VectorStore::new(&config).await?;
        let ollama = OllamaClient::new(&config)?;

        Ok(Self {
            config,
            vector_store,
            ollama,
        })
    }

    #[inline]
    pub fn vector_store(&self) -> &VectorStore {
        &self.vector_store
    }

    #[inline]
    pub fn embedder(&self) -> &OllamaClient {
        &self.ollama
    }

    /// Extract, chunk, embed, and store one document. Returns the assigned
    /// document id and the number of chunks indexed (zero for a document
    /// whose text is empty after extraction).
    #[inline]
    pub async fn index_document(
        &self,
        path: &Path,
        doc_type: DocType,
        source_override: Option<String>,
    ) -> Result<IndexedDocument> {
        let source = source_override.unwrap_or_else(|| {
            path.file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
        });

        let text = extract_text(path)?;
        let chunks = chunk_text(&text, &self.config.chunking);
        let doc_id = new_doc_id(doc_type);

        let chunks_indexed = self
            .vector_store
            .index_chunks(
                &self.ollama,
                doc_type.collection(),
                &doc_id,
                &chunks,
                &BaseMetadata {
                    source: source.clone(),
                    doc_type,
                },
            )
            .await?;

        info!(
            "Indexed document {} ({} chunks) from {}",
            doc_id, chunks_indexed, source
        );

        Ok(IndexedDocument {
            doc_id,
            source,
            chunks_indexed,
        })
    }

    /// Rank resume chunks against a previously indexed job description
    #[inline]
    pub async fn match_candidates(
        &self,
        jd_doc_id: &str,
        top_k: usize,
    ) -> Result<Vec<CandidateMatch>> {
        match_candidates(&self.vector_store, &self.ollama, jd_doc_id, top_k).await
    }
}

/// Generate a fresh document id, `{type-tag}-{random-hex}`
#[inline]
pub fn new_doc_id(doc_type: DocType) -> String {
    format!("{}-{}", doc_type.tag(), Uuid::new_v4().simple())
}
