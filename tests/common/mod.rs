//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use axum::http::{header, StatusCode};
use axum::routing::{get, MethodRouter};
use axum::Router;
use pdf2text::{DocumentParser, ExtractionConfig, ParseError, ParsedDocument};
use pdfium_loader::LoaderOptions;
use std::sync::Arc;

// ── HTTP ─────────────────────────────────────────────────────────────────────

/// Route pipeline logs through the test harness' captured output.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("pdf2text=debug")
        .with_test_writer()
        .try_init();
}

/// Serve `router` on an ephemeral localhost port; returns the base URL.
pub async fn serve(router: Router) -> String {
    init_logging();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

/// A GET route answering with `body` and the given content type.
pub fn file(content_type: &'static str, body: Vec<u8>) -> MethodRouter {
    get(move || {
        let body = body.clone();
        async move { ([(header::CONTENT_TYPE, content_type)], body) }
    })
}

pub fn not_found() -> MethodRouter {
    get(|| async { (StatusCode::NOT_FOUND, "no such resume") })
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/resume.pdf")
}

// ── Fake engine ──────────────────────────────────────────────────────────────

/// Header of a [`FormFeedParser`] document.
pub const FAKE_HEADER: &[u8] = b"%PDF-FAKE\n";

/// A document format for pipeline tests that do not need pdfium:
/// `%PDF-FAKE\n` followed by UTF-8 pages separated by form feeds.
pub fn fake_pdf(pages: &[&str]) -> Vec<u8> {
    let mut out = FAKE_HEADER.to_vec();
    out.extend_from_slice(pages.join("\x0c").as_bytes());
    out
}

pub struct FormFeedParser;

struct FormFeedDocument {
    pages: Vec<String>,
}

impl ParsedDocument for FormFeedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ParseError> {
        Ok(self.pages[index].clone())
    }
}

impl DocumentParser for FormFeedParser {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn ParsedDocument + 'a>, ParseError> {
        let body = bytes.strip_prefix(FAKE_HEADER).ok_or_else(|| ParseError::Open {
            detail: "not a PDF".into(),
        })?;
        let text = std::str::from_utf8(body).map_err(|e| ParseError::Open {
            detail: e.to_string(),
        })?;
        let pages = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\x0c').map(str::to_string).collect()
        };
        Ok(Box::new(FormFeedDocument { pages }))
    }
}

pub fn fake_config() -> ExtractionConfig {
    ExtractionConfig::builder()
        .download_timeout_secs(5)
        .parser(Arc::new(FormFeedParser))
        .build()
        .expect("valid config")
}

// ── Real PDFs ────────────────────────────────────────────────────────────────

/// Build a PDF with one page per entry, each drawing its string in Helvetica.
/// An empty string yields a blank page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    // Objects: 1 catalog, 2 page tree, 3 font, then (page, content) pairs.
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            let escaped = text
                .replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)");
            format!("BT /F1 24 Tf 72 700 Td ({escaped}) Tj ET")
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Config for tests that need the real pdfium engine, or `None` when it
/// cannot be bound. Downloads pdfium only when `PDF2TEXT_TEST_DOWNLOAD_ENGINE`
/// is set.
pub async fn pdfium_config() -> Option<ExtractionConfig> {
    let allow_download = engine_download_allowed();
    // The loader downloads with a blocking client.
    let bound = tokio::task::spawn_blocking(|| {
        pdfium_loader::bind(&engine_options()).map(drop)
    })
    .await
    .expect("bind task");
    if let Err(e) = bound {
        println!("SKIP: pdfium unavailable: {e}");
        return None;
    }
    Some(
        ExtractionConfig::builder()
            .download_timeout_secs(5)
            .allow_engine_download(allow_download)
            .build()
            .expect("valid config"),
    )
}

/// Loader options matching [`pdfium_config`].
pub fn engine_options() -> LoaderOptions {
    LoaderOptions::default().allow_download(engine_download_allowed())
}

fn engine_download_allowed() -> bool {
    std::env::var_os("PDF2TEXT_TEST_DOWNLOAD_ENGINE").is_some()
}
