#[cfg(test)]
mod tests;

use serde::Serialize;
use tracing::{debug, info};

use crate::database::lancedb::{DocType, VectorStore};
use crate::embeddings::Embedder;
use crate::{MatchError, Result};

/// A resume chunk ranked against a job description
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    pub resume_doc_id: String,
    pub chunk: String,
    pub similarity: f32,
}

/// Convert a cosine distance to a similarity score. For normalized vectors
/// the distance lies in [0, 2], so the score lies in [-1, 1]. Monotonically
/// decreasing in distance; not a probability.
#[inline]
pub fn similarity_from_distance(distance: f32) -> f32 {
    1.0 - distance
}

/// Rank resume chunks against a previously indexed job description.
///
/// The query representative is the job description's first stored chunk
/// only, not a summary of the whole document. That truncation mirrors how
/// the matching endpoint has always behaved and is a known precision
/// limitation; callers wanting whole-document matching must change the
/// contract, not this function.
///
/// Results keep the store's ascending-distance order (descending
/// similarity); ties keep the store's return order. An empty resume
/// collection yields an empty list. An unknown `jd_doc_id` is a `NotFound`
/// error.
#[inline]
pub async fn match_candidates(
    store: &VectorStore,
    embedder: &dyn Embedder,
    jd_doc_id: &str,
    top_k: usize,
) -> Result<Vec<CandidateMatch>> {
    debug!("Matching candidates for {} (top_k = {})", jd_doc_id, top_k);

    let jd_chunks = store
        .get_by_doc_id(DocType::Jd.collection(), jd_doc_id)
        .await?;

    let representative = jd_chunks
        .first()
        .ok_or_else(|| MatchError::NotFound(jd_doc_id.to_string()))?;

    let results = store
        .query_similar(
            embedder,
            DocType::Resume.collection(),
            &representative.content,
            top_k,
        )
        .await?;

    let matches = results
        .into_iter()
        .map(|result| CandidateMatch {
            resume_doc_id: result.metadata.doc_id,
            chunk: result.metadata.content,
            similarity: similarity_from_distance(result.distance),
        })
        .collect::<Vec<_>>();

    info!(
        "Matched {} resume chunks against {}",
        matches.len(),
        jd_doc_id
    );
    Ok(matches)
}
