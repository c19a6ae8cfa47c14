
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::{MatchError, Result};

/// Extract the full text of a document file.
///
/// PDF files go through `pdf-extract`; anything else is read as plain text.
/// An unreadable document is a document-level `Extraction` error. An empty
/// result is legal and simply yields zero chunks downstream.
#[inline]
pub fn extract_text(path: &Path) -> Result<String> {
    debug!("Extracting text from {:?}", path);

    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        pdf_extract::extract_text(path)
            .map_err(|e| MatchError::Extraction(format!("Failed to read PDF {:?}: {}", path, e)))?
    } else {
        fs::read_to_string(path)
            .map_err(|e| MatchError::Extraction(format!("Failed to read {:?}: {}", path, e)))?
    };

    if text.trim().is_empty() {
        warn!("Extraction produced no text for {:?}", path);
    }

    Ok(text)
}
