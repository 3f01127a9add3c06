use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::ErrorResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Validation,
    Internal,
    Other,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            404 => Self::NotFound,
            422 => Self::Validation,
            500..=599 => Self::Internal,
            _ => Self::Other,
        }
    }
}

/// An application-level refusal from the backend: a non-2xx status, with the
/// `detail` string when the body carried one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?} ({status}): {}", .detail.as_deref().unwrap_or("<no detail>"))]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: u16,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            detail,
        }
    }

    /// Builds the error from a raw response body. Bodies that are not JSON, or
    /// whose `detail` is not a string (e.g. a validation error list), carry no
    /// detail.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .and_then(ErrorResponse::into_detail_text);
        Self::new(status, detail)
    }

    pub fn detail_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.detail.as_deref() {
            Some(detail) if !detail.is_empty() => detail,
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_string_detail() {
        let err = ApiError::from_body(400, br#"{"detail":"Already signed up"}"#);
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(err.detail_or("An error occurred"), "Already signed up");
    }

    #[test]
    fn falls_back_for_non_json_body() {
        let err = ApiError::from_body(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.detail, None);
        assert_eq!(err.detail_or("An error occurred"), "An error occurred");
    }

    #[test]
    fn validation_lists_are_not_shown_verbatim() {
        let body = br#"{"detail":[{"loc":["query","email"],"msg":"field required"}]}"#;
        let err = ApiError::from_body(422, body);
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.detail_or("fallback"), "fallback");
    }

    #[test]
    fn empty_detail_uses_fallback() {
        let err = ApiError::new(404, Some(String::new()));
        assert_eq!(err.detail_or("Failed to remove participant"), "Failed to remove participant");
    }
}
