//! The result envelope returned by the orchestrator and printed by the CLI.

use crate::error::{EnvelopeError, ErrorKind, ExtractError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Outcome of one URL-to-text run.
///
/// Serialises to exactly three keys:
///
/// ```json
/// { "status": "success", "extracted_text": "…", "error_message": null }
/// ```
///
/// On error `extracted_text` is `""` and `error_message` carries the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    pub status: Status,
    pub extracted_text: String,
    pub error_message: Option<String>,

    /// Failure origin, for in-process callers. Not part of the JSON contract.
    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
}

impl ExtractionEnvelope {
    pub fn success(text: String) -> Self {
        Self {
            status: Status::Success,
            extracted_text: text,
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failure(err: &ExtractError) -> Self {
        Self {
            status: Status::Error,
            extracted_text: String::new(),
            error_message: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Convert back into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<String, EnvelopeError> {
        match self.status {
            Status::Success => Ok(self.extracted_text),
            Status::Error => Err(EnvelopeError {
                kind: self.error_kind,
                message: self.error_message.unwrap_or_default(),
            }),
        }
    }
}
