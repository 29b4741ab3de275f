//! Occupation service client: the single point of entry for all calls to the
//! remote classification web service.
//!
//! No other module issues HTTP requests. Callers hand in a fully formed URL and
//! get back the status code and body; interpreting the body is their job.
//! No retries, no explicit timeout: the reqwest defaults apply.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::Credentials;

pub mod endpoints;

#[cfg(test)]
pub mod fake;

pub use endpoints::Endpoints;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Status code and body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Authenticated GET against the occupation service.
///
/// Carried in `AppState` as `Arc<dyn Transport>` so tests can script responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport applying fixed Basic credentials to every request.
#[derive(Clone)]
pub struct OnetClient {
    client: Client,
    credentials: Credentials,
}

impl OnetClient {
    pub fn new(credentials: Credentials) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait]
impl Transport for OnetClient {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("GET {url} -> {status} ({} bytes)", body.len());

        Ok(RawResponse { status, body })
    }
}
