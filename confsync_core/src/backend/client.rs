//! HTTP client for the sync backend
//!
//! Wraps [`reqwest`]. The client reports what the backend answered and leaves
//! the decision about non-success statuses to the caller, which needs the raw
//! body to persist it.

use super::Endpoint;
use crate::error::{ProtocolError, Result};
use log::debug;
use serde::Serialize;
use std::time::Duration;

/// Backend location used when nothing is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3004";

/// Status and raw body of a backend answer
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, naming `endpoint` on failure
    pub fn json(&self, endpoint: Endpoint) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| ProtocolError::malformed(endpoint.name(), e.to_string()).into())
    }
}

/// HTTP client bound to one backend base URL
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for `base_url`
    ///
    /// `timeout` of `None` leaves requests unbounded, matching a backend whose
    /// extraction and apply phases can run for a long time.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ProtocolError::transport("client", e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// `POST <endpoint>?<query>` with a JSON body
    pub async fn post<Q, B>(&self, endpoint: Endpoint, query: &Q, body: &B) -> Result<BackendResponse>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = endpoint.url(&self.base_url);
        debug!("POST {url}");

        let request = self.http.post(&url).query(query).json(body);
        Self::send(endpoint, request).await
    }

    /// `POST <endpoint>` with a JSON body and no query string
    pub async fn post_json<B>(&self, endpoint: Endpoint, body: &B) -> Result<BackendResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = endpoint.url(&self.base_url);
        debug!("POST {url}");

        Self::send(endpoint, self.http.post(&url).json(body)).await
    }

    /// `GET <endpoint>`
    pub async fn get(&self, endpoint: Endpoint) -> Result<BackendResponse> {
        let url = endpoint.url(&self.base_url);
        debug!("GET {url}");

        Self::send(endpoint, self.http.get(&url)).await
    }

    async fn send(endpoint: Endpoint, request: reqwest::RequestBuilder) -> Result<BackendResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| ProtocolError::transport(endpoint.name(), e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProtocolError::transport(endpoint.name(), e.to_string()))?;

        debug!("{endpoint} answered {status} ({} bytes)", body.len());
        Ok(BackendResponse { status, body })
    }
}
