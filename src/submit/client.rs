//! HTTP client wrapper for posting time sheets.
//!
//! [`SubmitClient`] issues exactly one POST per call and turns the response
//! into either a [`ResponseArtifact`] (status 200) or a
//! [`SubmitError::Rejected`] carrying the server's explanation.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{ARTIFACT_FILENAME, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::SubmitError;
use super::payload::{RequestBody, Variant};
use super::sink::ResponseArtifact;
use crate::user_agent;

/// HTTP client bound to one server.
///
/// Create it once and reuse it; reqwest pools connections underneath.
#[derive(Debug, Clone)]
pub struct SubmitClient {
    client: Client,
    server: Url,
}

impl SubmitClient {
    /// Creates a client for `server` with default timeouts
    /// (30s connect, 5min read).
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidEndpoint`] if `server` is not an
    /// absolute http(s) URL, or [`SubmitError::Network`] if the HTTP client
    /// cannot be built.
    pub fn new(server: &str) -> Result<Self, SubmitError> {
        Self::with_timeouts(server, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_timeouts(
        server: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, SubmitError> {
        let server = parse_server_url(server)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|e| SubmitError::network(server.as_str(), e))?;
        Ok(Self { client, server })
    }

    /// The server base URL.
    #[must_use]
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// Full URL of the endpoint for `variant`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidEndpoint`] if the path cannot be joined.
    pub fn endpoint(&self, variant: Variant) -> Result<Url, SubmitError> {
        self.server
            .join(variant.endpoint_path())
            .map_err(|_| SubmitError::invalid_endpoint(self.server.as_str()))
    }

    /// Posts `body` to the endpoint of `variant` and collects the document.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Rejected`] for any status other than 200, with the
    ///   body as text
    /// - [`SubmitError::Timeout`] / [`SubmitError::Network`] for transport
    ///   failures, including a body that cannot be read
    #[instrument(skip(self, body), fields(server = %self.server, variant = variant.as_str()))]
    pub async fn post(
        &self,
        variant: Variant,
        body: RequestBody,
    ) -> Result<ResponseArtifact, SubmitError> {
        let url = self.endpoint(variant)?;
        let content_type = body.content_type();
        debug!(url = %url, content_type, "posting request");

        let request = self.client.post(url.clone());
        let request = match body {
            RequestBody::Form(text) => request.header(CONTENT_TYPE, content_type).body(text),
            RequestBody::Json(value) => request.json(&value),
        };
        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::network(url.as_str(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = response
                .text()
                .await
                .map_err(|e| SubmitError::network(url.as_str(), e))?;
            debug!(status = status.as_u16(), "server rejected request");
            return Err(SubmitError::rejected(status.as_u16(), reason));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| SubmitError::network(url.as_str(), e))?;

        info!(
            status = status.as_u16(),
            bytes = body.len(),
            content_type = content_type.as_deref().unwrap_or("-"),
            "document received"
        );

        Ok(ResponseArtifact {
            filename: ARTIFACT_FILENAME.to_string(),
            content_type,
            bytes: body.to_vec(),
        })
    }
}

/// Parses the server base URL.
///
/// A missing trailing slash is added so that relative endpoint paths like
/// `tsg/` land below the configured path instead of replacing its last
/// segment.
fn parse_server_url(server: &str) -> Result<Url, SubmitError> {
    let mut url = Url::parse(server.trim()).map_err(|_| SubmitError::invalid_endpoint(server))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(SubmitError::invalid_endpoint(server));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
