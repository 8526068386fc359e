//! Orchestration: fetch → extract → envelope.
//!
//! [`process_url`] is the recovery boundary. Every [`ExtractError`] from the
//! two stages is turned into an error [`ExtractionEnvelope`]; nothing escapes
//! as a panic or an `Err`. Callers that want the failure as a value use
//! [`extract_from_url`] directly.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, NetworkError, ParseError};
use crate::output::ExtractionEnvelope;
use crate::pipeline::{extract, fetch};
use std::time::Instant;
use tracing::{error, info};

/// Download a PDF and return its text wrapped in an envelope.
///
/// Never fails: on error the envelope has `status = error`, an empty
/// `extracted_text` and the stringified cause in `error_message`.
///
/// ```rust,no_run
/// use pdf2text::{process_url, ExtractionConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let envelope = process_url("https://example.com/resume.pdf", &ExtractionConfig::default()).await;
/// println!("{}", serde_json::to_string_pretty(&envelope).unwrap());
/// # }
/// ```
pub async fn process_url(url: impl AsRef<str>, config: &ExtractionConfig) -> ExtractionEnvelope {
    let start = Instant::now();
    match extract_from_url(url.as_ref(), config).await {
        Ok(text) => {
            info!(
                "PDF processing completed successfully in {}ms",
                start.elapsed().as_millis()
            );
            ExtractionEnvelope::success(text)
        }
        Err(e) => {
            error!("PDF processing failed: {}", e);
            ExtractionEnvelope::failure(&e)
        }
    }
}

/// Synchronous wrapper around [`process_url`].
///
/// Creates a temporary tokio runtime internally; a runtime that cannot be
/// created is reported in the envelope like any other failure. Called from a
/// thread that already drives a runtime, the private runtime is started on a
/// scoped thread and the caller blocks until it finishes.
pub fn process_url_sync(url: impl AsRef<str>, config: &ExtractionConfig) -> ExtractionEnvelope {
    let url = url.as_ref();
    if tokio::runtime::Handle::try_current().is_err() {
        return run_on_private_runtime(url, config);
    }

    // A runtime cannot be started on a thread that is already driving one.
    std::thread::scope(|scope| {
        scope
            .spawn(|| run_on_private_runtime(url, config))
            .join()
            .unwrap_or_else(|_| runtime_failure(url, "extraction thread panicked".to_string()))
    })
}

fn run_on_private_runtime(url: &str, config: &ExtractionConfig) -> ExtractionEnvelope {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(process_url(url, config)),
        Err(e) => runtime_failure(url, format!("failed to create tokio runtime: {e}")),
    }
}

fn runtime_failure(url: &str, reason: String) -> ExtractionEnvelope {
    let err = ExtractError::Network(NetworkError::Request {
        url: url.to_string(),
        reason,
    });
    error!("PDF processing failed: {}", err);
    ExtractionEnvelope::failure(&err)
}

/// Fetch `url` and extract its text, returning the first failure.
pub async fn extract_from_url(url: &str, config: &ExtractionConfig) -> Result<String, ExtractError> {
    let bytes = fetch::fetch_pdf(url, config).await?;
    let text = extract::extract_text(bytes, config).await?;
    Ok(text)
}

/// Extract the text of a PDF already held in memory.
pub async fn extract_from_bytes(
    bytes: impl Into<Vec<u8>>,
    config: &ExtractionConfig,
) -> Result<String, ParseError> {
    extract::extract_text(bytes.into(), config).await
}
