//! Rate-limit aware, paginated GitHub REST fetching.
//!
//! [`GitHubClient`] issues requests one at a time, tracks the caller's quota
//! from both the `/rate_limit` endpoint and response headers, waits out
//! exhausted or abuse-limited windows, and follows `Link` headers to collect
//! complete result sets.

pub mod cli;
pub mod client;
pub mod clock;
mod collect;
pub mod config;
pub mod error;
pub mod http;
pub mod rate_limit;
pub mod types;

pub use client::{ApiResponse, GitHubClient, RetryReason};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::Config;
pub use error::FetchError;
pub use http::{PaginationCursor, RawResponse, ReqwestTransport, Transport};
pub use rate_limit::RateLimitState;
