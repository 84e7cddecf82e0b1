//! HTTP client seam used by the dispatcher
//!
//! [`HttpClient`] is the narrow interface the engine needs from a transport:
//! one method per verb, returning the raw status and body. [`BasicHttpClient`]
//! is the default implementation on top of reqwest.

use async_trait::async_trait;
use deltapi_core::ErrorKind;
use reqwest::{header, Client, RequestBuilder};
use std::time::Duration;
use thiserror::Error;

/// Raw response from one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport failure of one call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl ClientError {
    /// Kind recorded in the error envelope of a failed result
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connect(_) => ErrorKind::Connect,
            ClientError::Timeout(_) => ErrorKind::Timeout,
            ClientError::Request(_) => ErrorKind::Request,
            ClientError::Body(_) => ErrorKind::Body,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            ClientError::Timeout(message)
        } else if err.is_connect() {
            ClientError::Connect(message)
        } else if err.is_body() || err.is_decode() {
            ClientError::Body(message)
        } else {
            ClientError::Request(message)
        }
    }
}

/// Client for one of the two servers under comparison
///
/// URLs passed to the methods are relative to the client's base URL.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Client name (for logging)
    fn name(&self) -> &str;

    async fn get(&self, url: &str) -> Result<HttpResponse, ClientError>;

    async fn put(&self, url: &str, body: String) -> Result<HttpResponse, ClientError>;

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse, ClientError>;

    async fn delete(&self, url: &str) -> Result<HttpResponse, ClientError>;

    async fn patch(&self, url: &str, body: String) -> Result<HttpResponse, ClientError>;
}

/// Content type sent with request bodies unless overridden
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// reqwest-backed client bound to a base URL
#[derive(Clone)]
pub struct BasicHttpClient {
    client: Client,
    base_url: String,
    name: String,
    content_type: String,
}

impl BasicHttpClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            name: name.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        })
    }

    /// Override the content type sent with request bodies
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an action URL against the base URL; absolute URLs pass through
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    fn with_body(&self, request: RequestBuilder, body: String) -> RequestBuilder {
        request
            .header(header::CONTENT_TYPE, self.content_type.as_str())
            .body(body)
    }

    async fn send(&self, request: RequestBuilder) -> Result<HttpResponse, ClientError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ClientError::Body(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for BasicHttpClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, ClientError> {
        let request = self.client.get(self.resolve(url));
        self.send(request).await
    }

    async fn put(&self, url: &str, body: String) -> Result<HttpResponse, ClientError> {
        let request = self.with_body(self.client.put(self.resolve(url)), body);
        self.send(request).await
    }

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse, ClientError> {
        let request = self.with_body(self.client.post(self.resolve(url)), body);
        self.send(request).await
    }

    async fn delete(&self, url: &str) -> Result<HttpResponse, ClientError> {
        let request = self.client.delete(self.resolve(url));
        self.send(request).await
    }

    async fn patch(&self, url: &str, body: String) -> Result<HttpResponse, ClientError> {
        let request = self.with_body(self.client.patch(self.resolve(url)), body);
        self.send(request).await
    }
}
