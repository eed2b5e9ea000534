//! Rate-limit aware GitHub REST client.
//!
//! Requests are strictly sequential: every request, retry and wait completes
//! before the next one starts, and the quota snapshot is owned by the client.

mod gate;
mod paginate;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::http::{self, PaginationCursor, ReqwestTransport, Transport};
use crate::rate_limit::RateLimitState;
use log::{debug, warn};
use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub(crate) const TAG: &str = "ghub";

/// Decoded result of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
    pub cursor: PaginationCursor,
}

/// Why an attempt was discarded and must be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    AbuseRateLimit { retry_after: u64 },
    RateLimited,
    UnexpectedStatus(StatusCode),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbuseRateLimit { retry_after } => {
                write!(f, "abuse rate limit (Retry-After {}s)", retry_after)
            }
            Self::RateLimited => f.write_str("rate limit exhausted"),
            Self::UnexpectedStatus(s) => write!(f, "unexpected status {}", s),
        }
    }
}

enum Attempt {
    Done(ApiResponse),
    Retry(RetryReason),
}

pub struct GitHubClient<T = ReqwestTransport, C = SystemClock> {
    cfg: Config,
    transport: T,
    clock: C,
    default_headers: HeaderMap,
    rate: Option<RateLimitState>,
}

impl GitHubClient {
    /// Client over reqwest and the system clock.
    pub fn from_config(cfg: Config) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&cfg)?;
        Self::with_parts(cfg, transport, SystemClock)
    }
}

impl<T: Transport, C: Clock> GitHubClient<T, C> {
    pub fn with_parts(cfg: Config, transport: T, clock: C) -> Result<Self> {
        let default_headers = http::default_headers(&cfg)?;
        Ok(Self {
            cfg,
            transport,
            clock,
            default_headers,
            rate: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Last known quota snapshot without touching the network.
    pub fn cached_rate_limit(&self) -> Option<RateLimitState> {
        self.rate
    }

    /// Absolute URL for an API path such as `/rate_limit`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.api_url.trim_end_matches('/'), path)
    }

    /// Issue a GET, retrying on abuse limiting, quota exhaustion and
    /// unexpected status codes until it succeeds or the retry budget runs out.
    ///
    /// `headers` replaces the default header set when given.
    pub async fn execute(
        &mut self,
        url: &str,
        headers: Option<&HeaderMap>,
        expected: &[StatusCode],
    ) -> Result<ApiResponse> {
        let mut retry: u32 = 0;
        loop {
            match self.attempt(url, headers, expected, retry).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Retry(reason) => {
                    debug!(target: TAG, "Retrying {} after {} (retry {}).", url, reason, retry + 1);
                    retry += 1;
                }
            }
        }
    }

    async fn attempt(
        &mut self,
        url: &str,
        headers: Option<&HeaderMap>,
        expected: &[StatusCode],
        retry: u32,
    ) -> Result<Attempt> {
        if retry > self.cfg.max_retries {
            return Err(FetchError::RetriesExhausted {
                url: url.to_string(),
                attempts: retry,
            });
        }

        self.clock.sleep(self.cfg.request_delay).await;

        if self.is_rate_limited(false, false).await? {
            self.wait_for_reset().await?;
        }

        let res = self
            .transport
            .get(url, headers.unwrap_or(&self.default_headers))
            .await?;
        self.rate = Some(RateLimitState::from_headers(
            &res.headers,
            self.clock.now_epoch(),
        )?);

        if let Some(value) = res.headers.get(RETRY_AFTER) {
            let retry_after = value
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .ok_or_else(|| FetchError::InvalidHeader {
                    name: "retry-after",
                    value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                })?;
            warn!(
                target: TAG,
                "Received Retry-After (abuse rate limiting), trying again after '{}' seconds.",
                retry_after
            );
            self.clock.sleep(Duration::from_secs(retry_after)).await;
            self.refresh_rate_limit().await?;
            return Ok(Attempt::Retry(RetryReason::AbuseRateLimit { retry_after }));
        }

        let status = res.status;
        if status == StatusCode::FORBIDDEN || !expected.contains(&status) {
            if self.is_rate_limited(false, false).await? {
                self.wait_for_reset().await?;
                return Ok(Attempt::Retry(RetryReason::RateLimited));
            }
            warn!(target: TAG, "Unexpected status code {} for request {}.", status.as_u16(), url);
            return Ok(Attempt::Retry(RetryReason::UnexpectedStatus(status)));
        }

        let link = res.headers.get(LINK).and_then(|v| v.to_str().ok());
        let cursor = PaginationCursor::parse(link)?;
        let body = if res.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&res.body)?
        };
        Ok(Attempt::Done(ApiResponse {
            status,
            body,
            cursor,
        }))
    }

    /// Single request expecting `200 OK`, returning the decoded body.
    pub async fn get_json(&mut self, url: &str) -> Result<Value> {
        Ok(self.execute(url, None, &[StatusCode::OK]).await?.body)
    }
}
