//! Error types for the pdf2text library.
//!
//! Failures come from exactly two places, and each has its own type:
//!
//! * [`NetworkError`]: the Fetcher could not deliver the document bytes
//!   (bad URL, transport failure, timeout, non-2xx status, size ceiling).
//! * [`ParseError`]: the Extractor could not turn the bytes into text
//!   (engine unavailable, not a PDF, a page failed, page ceiling).
//!
//! [`ExtractError`] is the union returned by the fallible pipeline entry
//! points. The orchestrator ([`crate::process::process_url`]) converts it into
//! the error side of an [`crate::output::ExtractionEnvelope`].

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which pipeline stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Parse,
}

/// Fetcher failures. All variants are one error kind to callers.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The source reference could not be parsed as a URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// DNS, connect, TLS or body-read failure.
    #[error("Failed to download '{url}': {reason}")]
    Request { url: String, reason: String },

    /// The request did not complete within the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    Timeout { url: String, secs: u64 },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for '{url}'")]
    Status { url: String, status: StatusCode },

    /// The body is larger than `max_download_bytes`.
    #[error("Download of '{url}' exceeds the {limit}-byte limit")]
    TooLarge { url: String, limit: u64 },
}

/// Extractor failures.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The pdfium library could not be located or bound.
    #[error("PDF engine unavailable: {0}")]
    Engine(String),

    /// The bytes are not a document the engine can open.
    #[error("Failed to open PDF: {detail}")]
    Open { detail: String },

    /// A page (1-indexed) could not be decoded.
    #[error("Failed to extract text from page {page}: {detail}")]
    Page { page: usize, detail: String },

    #[error("PDF has {pages} pages, more than the {limit}-page limit")]
    TooManyPages { pages: usize, limit: usize },

    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Any failure of the fetch → extract pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::Network(_) => ErrorKind::Network,
            ExtractError::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Invalid [`crate::config::ExtractionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(pub String);

/// The error side of an envelope, recovered by
/// [`crate::output::ExtractionEnvelope::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EnvelopeError {
    /// `None` when the envelope was deserialised rather than produced in-process.
    pub kind: Option<ErrorKind>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_code_and_url() {
        let e = NetworkError::Status {
            url: "http://example.com/cv.pdf".into(),
            status: StatusCode::NOT_FOUND,
        };
        let msg = e.to_string();
        assert!(msg.contains("404 Not Found"), "got: {msg}");
        assert!(msg.contains("http://example.com/cv.pdf"), "got: {msg}");
    }

    #[test]
    fn extract_error_is_transparent() {
        let inner = ParseError::Page {
            page: 3,
            detail: "bad stream".into(),
        };
        let expected = inner.to_string();
        let e = ExtractError::from(inner);
        assert_eq!(e.to_string(), expected);
        assert_eq!(e.kind(), ErrorKind::Parse);
    }

    #[test]
    fn network_errors_share_one_kind() {
        let timeout: ExtractError = NetworkError::Timeout {
            url: "http://x".into(),
            secs: 30,
        }
        .into();
        let too_large: ExtractError = NetworkError::TooLarge {
            url: "http://x".into(),
            limit: 10,
        }
        .into();
        assert_eq!(timeout.kind(), ErrorKind::Network);
        assert_eq!(too_large.kind(), ErrorKind::Network);
        assert!(timeout.to_string().contains("30s"));
    }

    #[test]
    fn page_ceiling_display() {
        let e = ParseError::TooManyPages {
            pages: 5000,
            limit: 2000,
        };
        assert!(e.to_string().contains("5000"));
        assert!(e.to_string().contains("2000-page"));
    }

    #[test]
    fn error_kind_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&ErrorKind::Parse).unwrap(), "\"parse\"");
    }
}
