//! Request and response bodies exchanged with the ingestion and Q&A backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Multipart field name carrying each uploaded file.
pub const UPLOAD_FIELD: &str = "files";

/// Body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// User input that is empty once trimmed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("please enter a question")]
pub struct EmptyQuestion;

impl AskRequest {
    /// Builds a request from user input, trimming it first.
    pub fn new(question: &str) -> Result<Self, EmptyQuestion> {
        let question = question.trim();
        if question.is_empty() {
            return Err(EmptyQuestion);
        }
        Ok(Self {
            question: question.to_string(),
        })
    }
}

/// Success body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Success body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Failure body of either endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid HTTP status {0}")]
    InvalidStatus(u32),
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("request failed with HTTP status {status}")]
    Status { status: u16 },
    #[error("could not reach the server: {0}")]
    Transport(String),
    #[error("unexpected response from server: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::Status { status } => Some(*status),
            ApiError::InvalidStatus(_) | ApiError::Transport(_) | ApiError::MalformedBody(_) => None,
        }
    }
}

/// Interprets a backend reply.
///
/// A 2xx status must carry a `T`; anything else is a failure, described by
/// the `detail` field when the body has one.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_str(body)?);
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail }) => {
            tracing::debug!(status, %detail, "backend rejected request");
            Err(ApiError::Rejected { status, detail })
        }
        Err(_) => {
            tracing::warn!(status, "backend failure without a detail body");
            Err(ApiError::Status { status })
        }
    }
}

/// Decodes a `/ask` reply and formats its answer as HTML.
///
/// `status` comes from callers whose integer type is wider than an HTTP
/// status; values above `u16::MAX` are rejected.
pub fn format_answer(status: u32, body: &str) -> Result<String, ApiError> {
    let status = u16::try_from(status).map_err(|_| ApiError::InvalidStatus(status))?;
    let response: AskResponse = decode_response(status, body)?;
    Ok(crate::format_message(&response.answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ask_request_trims_and_rejects_blank_input() {
        assert_eq!(
            AskRequest::new("  what is this?\n").unwrap(),
            AskRequest {
                question: "what is this?".to_string()
            }
        );
        assert_eq!(AskRequest::new(" \t "), Err(EmptyQuestion));
    }

    #[test]
    fn ask_request_serializes_question_field() {
        let body = serde_json::to_string(&AskRequest::new("hi").unwrap()).unwrap();
        assert_eq!(body, r#"{"question":"hi"}"#);
    }

    #[test]
    fn decodes_success_bodies() {
        let answer: AskResponse = decode_response(200, r#"{"answer":"**yes**"}"#).unwrap();
        assert_eq!(answer.answer, "**yes**");

        let upload: UploadResponse = decode_response(
            200,
            r#"{"status":"success","message":"Documents processed successfully."}"#,
        )
        .unwrap();
        assert_eq!(upload.message, "Documents processed successfully.");
        assert_eq!(upload.status.as_deref(), Some("success"));
    }

    #[test]
    fn failure_detail_becomes_error_message() {
        let err = decode_response::<AskResponse>(
            400,
            r#"{"detail":"No documents have been processed yet."}"#,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "No documents have been processed yet.");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn failure_without_detail_reports_status() {
        let err = decode_response::<AskResponse>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 502 }));
        assert_eq!(err.to_string(), "request failed with HTTP status 502");
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        let err = decode_response::<AskResponse>(200, r#"{"detail":"odd"}"#).unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn format_answer_renders_successful_replies() {
        assert_eq!(
            format_answer(200, r#"{"answer":"1. **a**\n2. b"}"#).unwrap(),
            "<ol><li><strong>a</strong></li><li>b</li></ol>"
        );
    }

    #[test]
    fn format_answer_surfaces_backend_detail() {
        let err = format_answer(400, r#"{"detail":"No question was provided."}"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "No question was provided.");
    }

    #[test]
    fn format_answer_rejects_out_of_range_status() {
        let err = format_answer(70000, r#"{"answer":"x"}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidStatus(70000)));
        assert_eq!(err.to_string(), "invalid HTTP status 70000");
        assert_eq!(err.status(), None);
    }
}
