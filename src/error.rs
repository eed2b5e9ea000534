//! Fatal error taxonomy for the fetch client.
//!
//! Retryable conditions (abuse limiting, rate-limit exhaustion, unexpected
//! status codes) are resolved inside the executor and never surface here.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to update rate limit status, status code {status}")]
    RateLimitStatus { status: StatusCode },

    #[error("Failed to parse Link header: '{0}'")]
    MalformedLinkHeader(String),

    #[error("Response from {url} is not a list")]
    NotAList { url: String },

    #[error("Request to {url} failed after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("Missing response header '{0}'")]
    MissingHeader(&'static str),

    #[error("Invalid value for header '{name}': '{value}'")]
    InvalidHeader { name: &'static str, value: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_exhausted_reports_attempts() {
        let err = FetchError::RetriesExhausted {
            url: "https://api.github.com/orgs/o/repos".into(),
            attempts: 6,
        };
        assert_eq!(
            err.to_string(),
            "Request to https://api.github.com/orgs/o/repos failed after 6 attempts"
        );
    }
}
