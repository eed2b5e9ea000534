pub mod link;
#[cfg(test)]
pub(crate) mod mock;

use crate::config::Config;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub use link::PaginationCursor;

/// Status, headers and undecoded body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// GET primitive the client issues every request through.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse>;
}

pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    // Authorization travels with each request so callers can override it.
    Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()
}

fn auth_header(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| FetchError::InvalidHeader {
        name: "authorization",
        value: "<redacted>".into(),
    })
}

/// Headers sent with every request unless the caller supplies its own.
pub fn default_headers(cfg: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth_header(&cfg.token)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    let version =
        HeaderValue::from_str(&cfg.api_version).map_err(|_| FetchError::InvalidHeader {
            name: "x-github-api-version",
            value: cfg.api_version.clone(),
        })?;
    headers.insert("x-github-api-version", version);
    Ok(headers)
}

/// Percent-encode a single URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// `Transport` over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(build_client(cfg)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse> {
        let res = self.client.get(url).headers(headers.clone()).send().await?;
        let status = res.status();
        let headers = res.headers().clone();
        let body = res.text().await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
