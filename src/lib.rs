//! # pdf2text
//!
//! Download a PDF from a URL, extract its text page by page, and report the
//! outcome as a small JSON envelope:
//!
//! ```json
//! { "status": "success", "extracted_text": "…", "error_message": null }
//! ```
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Fetch    HTTP GET, 30 s timeout, byte ceiling, advisory content-type check
//!  ├─ 2. Extract  open with pdfium (spawn_blocking), concatenate per-page text
//!  └─ 3. Envelope success → text; any failure → status "error" + message
//! ```
//!
//! Failures are one of two kinds, [`NetworkError`] (stage 1) or
//! [`ParseError`] (stage 2). [`process_url`] never fails; it folds either
//! kind into the envelope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2text::{process_url, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ExtractionConfig::default();
//!     let envelope = process_url("https://example.com/resume.pdf", &config).await;
//!     match envelope.into_result() {
//!         Ok(text) => println!("{text}"),
//!         Err(e) => eprintln!("failed: {e}"),
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2text` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## PDF engine
//!
//! Text extraction uses pdfium through `pdfium-render`. The shared library is
//! located by the `pdfium-loader` crate (explicit path, `PDFIUM_LIB_PATH`,
//! cache, system library) and downloaded into the cache on first use unless
//! [`ExtractionConfig::allow_engine_download`] is off.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ExtractionConfig, ExtractionConfigBuilder, DEFAULT_MAX_DOWNLOAD_BYTES, DEFAULT_MAX_PAGES,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, EnvelopeError, ErrorKind, ExtractError, NetworkError, ParseError};
pub use output::{ExtractionEnvelope, Status};
pub use pipeline::extract::{DocumentParser, ParsedDocument};
pub use pipeline::pdfium::PdfiumParser;
pub use process::{extract_from_bytes, extract_from_url, process_url, process_url_sync};
