//! Pipeline stages for URL-to-text extraction.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ extract (pdfium)
//! (URL)     (bytes → text, on the blocking pool)
//! ```
//!
//! 1. [`fetch`]: HTTP GET with a timeout and a byte ceiling; the only stage
//!    with network I/O
//! 2. [`extract`]: open the bytes as a document and concatenate per-page
//!    text. The [`extract::DocumentParser`] trait is the seam between the
//!    page loop and the parsing engine
//! 3. [`pdfium`]: the default [`extract::DocumentParser`], backed by
//!    `pdfium-render`

pub mod extract;
pub mod fetch;
pub mod pdfium;
