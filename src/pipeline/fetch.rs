//! Fetcher: download the raw document bytes for a URL.
//!
//! A single attempt, bounded by the configured timeout. The body is read
//! chunk by chunk so the byte ceiling is enforced even when the server does
//! not declare a `Content-Length`. The content-type check is advisory only.

use crate::config::ExtractionConfig;
use crate::error::NetworkError;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Download `url` and return the response body.
pub async fn fetch_pdf(url: &str, config: &ExtractionConfig) -> Result<Vec<u8>, NetworkError> {
    info!("Starting download of PDF from URL: {}", url);
    match download(url, config).await {
        Ok(bytes) => {
            info!("PDF downloaded successfully ({} bytes)", bytes.len());
            Ok(bytes)
        }
        Err(e) => {
            error!("Failed to download PDF: {}", e);
            Err(e)
        }
    }
}

async fn download(url: &str, config: &ExtractionConfig) -> Result<Vec<u8>, NetworkError> {
    let secs = config.download_timeout_secs;
    let parsed = reqwest::Url::parse(url).map_err(|e| NetworkError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| request_error(url, secs, &e))?;

    let mut response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| request_error(url, secs, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            url: url.to_string(),
            status,
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_pdf_content_type(content_type) {
        warn!(
            "URL content-type is not application/pdf ({:?}). Proceeding anyway.",
            content_type
        );
    }

    let limit = config.max_download_bytes;
    let too_large = || NetworkError::TooLarge {
        url: url.to_string(),
        limit,
    };

    let declared = response.content_length();
    if declared.is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    let mut body = Vec::with_capacity(declared.unwrap_or(0) as usize);
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| request_error(url, secs, &e))?
    {
        if body.len() as u64 + chunk.len() as u64 > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    debug!("Read {} body bytes from {}", body.len(), url);

    Ok(body)
}

/// `true` when a `Content-Type` header value names a PDF.
pub fn is_pdf_content_type(value: &str) -> bool {
    value.to_ascii_lowercase().contains("application/pdf")
}

fn request_error(url: &str, secs: u64, err: &reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
            secs,
        }
    } else {
        NetworkError::Request {
            url: url.to_string(),
            reason: describe(err),
        }
    }
}

/// Flatten an error and its sources into one line.
///
/// reqwest's own message ("error sending request for url …") hides the
/// useful part (DNS failure, connection refused) in the source chain.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
