//! Paths of the three activity endpoints and server URL normalisation.

use url::Url;
use urlencoding::encode;

use crate::ClientError;

pub const ACTIVITIES_PATH: &str = "/activities";

pub fn signup_path(activity: &str, email: &str) -> String {
    format!(
        "{ACTIVITIES_PATH}/{}/signup?email={}",
        encode(activity),
        encode(email)
    )
}

pub fn participants_path(activity: &str, email: &str) -> String {
    format!(
        "{ACTIVITIES_PATH}/{}/participants?email={}",
        encode(activity),
        encode(email)
    )
}

/// Validates an http(s) base URL and strips trailing slashes so paths can be
/// appended directly.
pub fn normalize_server_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidServerUrl(raw.to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|_| ClientError::InvalidServerUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ClientError::InvalidServerUrl(raw.to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ClientError::InvalidServerUrl(raw.to_string()));
    }

    Ok(trimmed.to_string())
}
