use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success body of the sign-up and removal endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body of the sign-up and removal endpoints.
///
/// `detail` is usually a string but validation failures send a list, so it is
/// kept loosely typed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    pub fn into_detail_text(self) -> Option<String> {
        match self.detail {
            Some(Value::String(text)) => Some(text),
            _ => None,
        }
    }
}

/// Result of a mutating request that reached the server and came back with a
/// well-formed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Accepted { message: String },
    Rejected(crate::error::ApiError),
}

impl MutationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}
