//! Extractor: turn document bytes into plain text.
//!
//! The page loop is written once against the [`DocumentParser`] /
//! [`ParsedDocument`] pair; pdfium ([`super::pdfium::PdfiumParser`]) is the
//! default engine and tests plug in their own.
//!
//! Pages are visited in order and their text is appended with no separator.
//! The opened document is owned by [`extract_with`] and dropped when it
//! returns, including on a mid-loop page failure, which is what releases the
//! engine's handle.

use crate::config::ExtractionConfig;
use crate::error::ParseError;
use crate::pipeline::pdfium::PdfiumParser;
use tracing::{error, info};

/// A document-parsing engine.
///
/// A parser injected through [`ExtractionConfig::parser`] is shared with a
/// blocking-pool thread and must be `Send + Sync`. The pdfium parser is not;
/// it is bound on the thread that uses it.
pub trait DocumentParser {
    /// Open `bytes` as a document.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn ParsedDocument + 'a>, ParseError>;
}

/// An opened document. Dropping it releases the engine's resources.
pub trait ParsedDocument {
    fn page_count(&self) -> usize;

    /// Plain text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String, ParseError>;
}

/// Open `bytes` with `parser` and concatenate the text of every page.
pub fn extract_with(
    parser: &dyn DocumentParser,
    bytes: &[u8],
    max_pages: usize,
) -> Result<String, ParseError> {
    let document = parser.open(bytes)?;
    let page_count = document.page_count();
    info!("Opened PDF with {} pages.", page_count);

    if page_count > max_pages {
        return Err(ParseError::TooManyPages {
            pages: page_count,
            limit: max_pages,
        });
    }

    let mut text = String::new();
    for index in 0..page_count {
        text.push_str(&document.page_text(index)?);
    }
    Ok(text)
}

/// Extract the text of `bytes` on the blocking pool.
///
/// Uses [`ExtractionConfig::parser`] when set, otherwise binds pdfium via
/// [`ExtractionConfig::loader_options`]. The buffer is moved into the task and
/// dropped there once extraction finishes.
pub async fn extract_text(bytes: Vec<u8>, config: &ExtractionConfig) -> Result<String, ParseError> {
    let parser = config.parser.clone();
    let loader = config.loader_options();
    let max_pages = config.max_pages;

    let result = tokio::task::spawn_blocking(move || match parser {
        Some(parser) => extract_with(parser.as_ref(), &bytes, max_pages),
        None => {
            let pdfium = PdfiumParser::bind(&loader)?;
            extract_with(&pdfium, &bytes, max_pages)
        }
    })
    .await
    .unwrap_or_else(|e| Err(ParseError::Task(e.to_string())));

    match &result {
        Ok(_) => info!("Successfully extracted text from PDF."),
        Err(e) => error!("Failed to extract text from PDF: {}", e),
    }
    result
}
