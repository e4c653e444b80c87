use reqwest::StatusCode;
use thiserror::Error;
use crate::models::{ErrorBody, ValidationErrorBody};

/// Message shown for status 500; server detail is never surfaced
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again.";

const GENERIC_BAD_REQUEST: &str = "Invalid request";

/// A field rejected by the prediction service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Location joined with `.`, e.g. `body.edadMaterna`
    pub path: String,
    pub message: String,
}

/// Errors that can occur when talking to the prediction service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not reach the prediction service: {0}")]
    Unreachable(String),

    #[error("Invalid data: {}", format_issues(.0))]
    InvalidInput(Vec<FieldIssue>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{}", SERVER_ERROR_MESSAGE)]
    ServerError,

    #[error("HTTP error {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Request setup failed: {0}")]
    RequestSetup(String),

    #[error("Batch of {size} patients exceeds the maximum of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.path, issue.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classify a non-success response into the local taxonomy
///
/// This is the only place status codes are inspected.
pub fn classify_status(status: StatusCode, body: &str) -> ClientError {
    match status {
        StatusCode::UNPROCESSABLE_ENTITY => match serde_json::from_str::<ValidationErrorBody>(body) {
            Ok(parsed) => ClientError::InvalidInput(
                parsed
                    .detail
                    .into_iter()
                    .map(|detail| FieldIssue {
                        path: detail
                            .loc
                            .iter()
                            .map(|segment| segment.to_string())
                            .collect::<Vec<_>>()
                            .join("."),
                        message: detail.msg,
                    })
                    .collect(),
            ),
            Err(_) => ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.to_string(),
            },
        },
        StatusCode::BAD_REQUEST => {
            let detail = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|parsed| parsed.detail)
                .filter(|detail| !detail.trim().is_empty());
            ClientError::BadRequest(detail.unwrap_or_else(|| GENERIC_BAD_REQUEST.to_string()))
        }
        StatusCode::INTERNAL_SERVER_ERROR => ClientError::ServerError,
        other => ClientError::UnexpectedStatus {
            status: other.as_u16(),
            body: body.to_string(),
        },
    }
}

/// Classify a transport failure while connecting, sending or reading the body
pub fn classify_transport(err: &reqwest::Error) -> ClientError {
    if err.is_builder() {
        ClientError::RequestSetup(err.to_string())
    } else if err.is_timeout() {
        ClientError::Unreachable("request timed out".to_string())
    } else {
        ClientError::Unreachable(err.to_string())
    }
}
