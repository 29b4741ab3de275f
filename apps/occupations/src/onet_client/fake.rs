//! Scripted in-memory transport for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{RawResponse, Transport, TransportError};

/// Answers GETs from a URL → response table; unknown URLs get a 404.
/// Every requested URL is recorded in order.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, RawResponse>,
    unreachable: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.responses.insert(
            url.into(),
            RawResponse {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Makes `url` fail at the connection level.
    pub fn unreachable(mut self, url: impl Into<String>) -> Self {
        self.unreachable.insert(url.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.unreachable.contains(url) {
            // An unparseable URL is the cheapest way to obtain a real reqwest::Error.
            let err = reqwest::Client::new()
                .get("not a url")
                .build()
                .unwrap_err();
            return Err(TransportError::Http(err));
        }
        Ok(self.responses.get(url).cloned().unwrap_or(RawResponse {
            status: 404,
            body: "not found".to_string(),
        }))
    }
}
