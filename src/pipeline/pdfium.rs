//! pdfium-backed [`DocumentParser`].
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and must not be driven from async contexts. A [`PdfiumParser`] is
//! therefore bound and used inside `spawn_blocking` (see
//! [`super::extract::extract_text`]) and never crosses threads.
//!
//! `PdfDocument` closes the underlying handle in its `Drop`, so the document
//! is released whenever [`PdfiumDocument`] goes out of scope.

use crate::error::ParseError;
use crate::pipeline::extract::{DocumentParser, ParsedDocument};
use pdfium_loader::LoaderOptions;
use pdfium_render::prelude::*;
use tracing::debug;

/// A bound pdfium library.
pub struct PdfiumParser {
    pdfium: Pdfium,
}

impl PdfiumParser {
    /// Bind pdfium following `pdfium-loader`'s resolution order.
    pub fn bind(options: &LoaderOptions) -> Result<Self, ParseError> {
        let pdfium =
            pdfium_loader::bind(options).map_err(|e| ParseError::Engine(e.to_string()))?;
        Ok(Self { pdfium })
    }

    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl DocumentParser for PdfiumParser {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn ParsedDocument + 'a>, ParseError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| ParseError::Open {
                detail: format!("{:?}", e),
            })?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl ParsedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, ParseError> {
        let page_error = |detail: String| ParseError::Page {
            page: index + 1,
            detail,
        };

        let page_index = PdfPageIndex::try_from(index)
            .map_err(|_| page_error(format!("index {index} out of range")))?;
        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| page_error(format!("{:?}", e)))?;
        let text = page.text().map_err(|e| page_error(format!("{:?}", e)))?.all();

        debug!("Page {}: {} chars", index + 1, text.chars().count());
        Ok(text)
    }
}
