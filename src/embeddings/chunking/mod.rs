#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A chunk of document text ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// The chunk text, trimmed of surrounding whitespace
    pub content: String,
    /// The index of this chunk within the document
    pub chunk_index: usize,
}

/// Configuration for document chunking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chunk_chars: usize,
    /// Character overlap between adjacent chunks
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_chunk_chars: 1200,
            overlap_chars: 200,
        }
    }
}

impl ChunkingConfig {
    /// Window advance between chunk starts. When the configured overlap is
    /// not smaller than the window, the overlap is ignored and chunks do not
    /// overlap at all.
    #[inline]
    pub fn stride(&self) -> usize {
        if self.overlap_chars < self.max_chunk_chars {
            self.max_chunk_chars - self.overlap_chars
        } else {
            self.max_chunk_chars
        }
    }
}

/// Split document text into fixed-size overlapping windows.
///
/// Windows are measured in Unicode scalar values, not bytes, so multi-byte
/// text never splits inside a character. Each window is trimmed before it is
/// emitted; windows that trim to nothing are skipped and do not consume a
/// chunk index. Empty or whitespace-only input yields no chunks.
///
/// The function is pure: identical input and configuration always produce an
/// identical chunk sequence.
#[inline]
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<TextChunk> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();

    if total == 0 || config.max_chunk_chars == 0 {
        return chunks;
    }

    let stride = config.stride();
    let mut offset = 0;
    while offset < total {
        let end = (offset + config.max_chunk_chars).min(total);
        let window: String = chars[offset..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(TextChunk {
                content: trimmed.to_string(),
                chunk_index: chunks.len(),
            });
        }
        offset += stride;
    }

    debug!(
        "Chunked {} characters into {} chunks (window {}, overlap {})",
        total,
        chunks.len(),
        config.max_chunk_chars,
        config.overlap_chars
    );

    chunks
}
