//! Document extraction: turns an uploaded PDF into plain text for the prompt.
//!
//! PDF decoding is CPU-bound and may panic on malformed input, so it runs
//! inside `tokio::task::spawn_blocking`; a panic surfaces as a conversion error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 4000;
pub const TRUNCATION_MARKER: &str = "\n... [content truncated for analysis]";

/// Below this many characters the extraction probably missed the content.
const MIN_MEANINGFUL_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("File too large ({size} bytes). Maximum allowed: {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not convert the document: {0}. Make sure it is a valid PDF that is not password protected")]
    Conversion(String),

    #[error("No text could be extracted from the document")]
    Empty,
}

/// Converts a document on disk into text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// `pdf-extract` backed extractor with a file size cap.
pub struct PdfExtractor {
    max_bytes: u64,
}

impl PdfExtractor {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_BYTES)
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ExtractError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        check_size(metadata.len(), self.max_bytes)?;

        let bytes = tokio::fs::read(path).await?;
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractError::Conversion(format!("extraction task failed: {e}")))?
            .map_err(|e| ExtractError::Conversion(e.to_string()))?;

        debug!("Extracted {} characters from {}", text.len(), path.display());
        check_content(text)
    }
}

fn check_size(size: u64, max: u64) -> Result<(), ExtractError> {
    if size > max {
        return Err(ExtractError::TooLarge { size, max });
    }
    Ok(())
}

/// Rejects empty output and warns when very little text came out.
pub fn check_content(text: String) -> Result<String, ExtractError> {
    let meaningful = text.trim().chars().count();
    if meaningful == 0 {
        return Err(ExtractError::Empty);
    }
    if meaningful < MIN_MEANINGFUL_CHARS {
        warn!("Little content extracted from the document ({meaningful} chars); it may be corrupt or scanned");
    }
    Ok(text)
}

/// Cuts `text` to `max_chars` characters and marks the cut.
pub fn truncate_content(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate_content("short résumé", 4000), "short résumé");
    }

    #[test]
    fn test_text_at_budget_is_untouched() {
        let text = "a".repeat(4000);
        assert_eq!(truncate_content(&text, 4000), text);
    }

    #[test]
    fn test_long_text_is_cut_on_char_boundary() {
        let text = "é".repeat(10);
        let cut = truncate_content(&text, 4);
        assert_eq!(cut, format!("éééé{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_empty_content_is_rejected() {
        assert!(matches!(check_content("  \n ".to_string()), Err(ExtractError::Empty)));
    }

    #[test]
    fn test_little_content_is_still_returned() {
        assert_eq!(check_content("Ana Souza".to_string()).unwrap(), "Ana Souza");
    }

    #[test]
    fn test_size_cap() {
        assert!(check_size(DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_FILE_BYTES).is_ok());
        assert!(matches!(
            check_size(DEFAULT_MAX_FILE_BYTES + 1, DEFAULT_MAX_FILE_BYTES),
            Err(ExtractError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfExtractor::default()
            .extract(&dir.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        tokio::fs::write(&path, vec![b'x'; 2048]).await.unwrap();

        let err = PdfExtractor::new(1024).extract(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::TooLarge { size: 2048, max: 1024 }));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        tokio::fs::write(&path, b"%PDF-1.4 this is not really a pdf")
            .await
            .unwrap();

        let err = PdfExtractor::default().extract(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::Conversion(_)));
    }
}
