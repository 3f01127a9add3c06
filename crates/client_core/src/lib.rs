use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use shared::{
    domain::Catalog,
    error::ApiError,
    protocol::{MessageResponse, MutationOutcome},
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod endpoints;

pub use endpoints::normalize_server_url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {path}: {reason}")]
    Protocol { path: String, reason: String },
    #[error("{path} answered with status {status}")]
    UnexpectedStatus { path: String, status: u16 },
    #[error("invalid server url: {0:?}")]
    InvalidServerUrl(String),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}

/// The backend surface the page talks to.
///
/// A mutation that reaches the server and gets a well-formed answer returns
/// `Ok`, including refusals (`MutationOutcome::Rejected`). `Err` is reserved
/// for transport and protocol failures.
#[async_trait]
pub trait ActivityApi: Send + Sync {
    async fn list_activities(&self) -> Result<Catalog, ClientError>;
    async fn sign_up(&self, activity: &str, email: &str) -> Result<MutationOutcome, ClientError>;
    async fn remove_participant(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MutationOutcome, ClientError>;
}

pub struct HttpActivityClient {
    http: Client,
    server_url: String,
}

impl HttpActivityClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            server_url: normalize_server_url(server_url)?,
        })
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                path: String::new(),
                source,
            })?;
        Ok(Self {
            http,
            server_url: normalize_server_url(server_url)?,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn send(&self, method: Method, path: &str) -> Result<(u16, Vec<u8>), ClientError> {
        debug!(%method, path, "sending activity request");
        let transport = |source| ClientError::Transport {
            path: path.to_string(),
            source,
        };
        let res = self
            .http
            .request(method, format!("{}{}", self.server_url, path))
            .send()
            .await
            .map_err(transport)?;
        let status = res.status().as_u16();
        let body = res.bytes().await.map_err(transport)?;
        debug!(path, status, bytes = body.len(), "activity response received");
        Ok((status, body.to_vec()))
    }

    async fn mutate(&self, method: Method, path: &str) -> Result<MutationOutcome, ClientError> {
        let (status, body) = self.send(method, path).await?;
        if !(200..300).contains(&status) {
            let error = ApiError::from_body(status, &body);
            warn!(path, status, detail = ?error.detail, "activity mutation rejected");
            return Ok(MutationOutcome::Rejected(error));
        }

        let parsed: MessageResponse =
            serde_json::from_slice(&body).map_err(|e| ClientError::Protocol {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(MutationOutcome::Accepted {
            message: parsed.message,
        })
    }
}

#[async_trait]
impl ActivityApi for HttpActivityClient {
    async fn list_activities(&self) -> Result<Catalog, ClientError> {
        let path = endpoints::ACTIVITIES_PATH;
        let (status, body) = self.send(Method::GET, path).await?;
        if !(200..300).contains(&status) {
            return Err(ClientError::UnexpectedStatus {
                path: path.to_string(),
                status,
            });
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::Protocol {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    async fn sign_up(&self, activity: &str, email: &str) -> Result<MutationOutcome, ClientError> {
        self.mutate(Method::POST, &endpoints::signup_path(activity, email))
            .await
    }

    async fn remove_participant(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<MutationOutcome, ClientError> {
        self.mutate(Method::DELETE, &endpoints::participants_path(activity, email))
            .await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
