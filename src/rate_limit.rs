use crate::error::{FetchError, Result};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Snapshot of the caller's request quota.
///
/// Replaced wholesale on every refresh, whether it comes from the
/// `/rate_limit` endpoint or from the headers of an ordinary response.
/// `used + remaining == limit` is not guaranteed across the two sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitState {
    pub limit: i64,
    pub used: i64,
    pub remaining: i64,
    pub reset_at_utc: i64,
    pub reset_in_sec: i64,
    pub last_update: i64,
}

/// `rate` object of the `/rate_limit` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RateResource {
    pub limit: i64,
    pub used: i64,
    pub remaining: i64,
    pub reset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub rate: RateResource,
}

impl RateLimitState {
    pub fn from_status(rate: &RateResource, now: i64) -> Self {
        Self {
            limit: rate.limit,
            used: rate.used,
            remaining: rate.remaining,
            reset_at_utc: rate.reset,
            reset_in_sec: rate.reset.saturating_sub(now),
            last_update: now,
        }
    }

    pub fn from_headers(headers: &HeaderMap, now: i64) -> Result<Self> {
        let limit = header_i64(headers, HEADER_LIMIT)?;
        let remaining = header_i64(headers, HEADER_REMAINING)?;
        let reset_at_utc = header_i64(headers, HEADER_RESET)?;
        let used = limit
            .checked_sub(remaining)
            .ok_or_else(|| out_of_range(HEADER_REMAINING, remaining))?;
        let reset_in_sec = reset_at_utc
            .checked_sub(now)
            .ok_or_else(|| out_of_range(HEADER_RESET, reset_at_utc))?;
        Ok(Self {
            limit,
            used,
            remaining,
            reset_at_utc,
            reset_in_sec,
            last_update: now,
        })
    }

    pub fn is_stale(&self, now: i64, max_age_sec: i64) -> bool {
        now.saturating_sub(self.last_update) > max_age_sec
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }
}

fn out_of_range(name: &'static str, value: i64) -> FetchError {
    FetchError::InvalidHeader {
        name,
        value: value.to_string(),
    }
}

pub(crate) fn header_i64(headers: &HeaderMap, name: &'static str) -> Result<i64> {
    let value = headers.get(name).ok_or(FetchError::MissingHeader(name))?;
    let text = value.to_str().map_err(|_| FetchError::InvalidHeader {
        name,
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    })?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| FetchError::InvalidHeader {
            name,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(limit: &str, remaining: &str, reset: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(HEADER_LIMIT, limit.parse().unwrap());
        h.insert(HEADER_REMAINING, remaining.parse().unwrap());
        h.insert(HEADER_RESET, reset.parse().unwrap());
        h
    }

    #[test]
    fn headers_derive_used_and_reset_in() {
        let state = RateLimitState::from_headers(&headers("5000", "4990", "1300"), 1000).unwrap();
        assert_eq!(state.limit, 5000);
        assert_eq!(state.used, 10);
        assert_eq!(state.remaining, 4990);
        assert_eq!(state.reset_at_utc, 1300);
        assert_eq!(state.reset_in_sec, 300);
        assert_eq!(state.last_update, 1000);
        assert!(!state.is_exhausted());
    }

    #[test]
    fn missing_header_is_fatal() {
        let mut h = headers("5000", "0", "1300");
        h.remove(HEADER_RESET);
        let err = RateLimitState::from_headers(&h, 1000).unwrap_err();
        assert!(matches!(err, FetchError::MissingHeader(HEADER_RESET)));
    }

    #[test]
    fn non_numeric_header_is_fatal() {
        let err = RateLimitState::from_headers(&headers("lots", "0", "1300"), 1000).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { name: HEADER_LIMIT, .. }));
    }

    #[test]
    fn status_body_keeps_reported_used() {
        let body: RateLimitResponse = serde_json::from_str(
            r#"{"resources":{},"rate":{"limit":60,"used":7,"remaining":50,"reset":2000}}"#,
        )
        .unwrap();
        let state = RateLimitState::from_status(&body.rate, 1900);
        assert_eq!(state.used, 7);
        assert_eq!(state.remaining, 50);
        assert_eq!(state.reset_in_sec, 100);
    }

    #[test]
    fn extreme_reset_header_is_rejected() {
        let err = RateLimitState::from_headers(
            &headers("5000", "10", "-9223372036854775808"),
            1_700_000_000,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FetchError::InvalidHeader { name: HEADER_RESET, ref value } if value == "-9223372036854775808"
        ));
    }

    #[test]
    fn extreme_remaining_header_is_rejected() {
        let err = RateLimitState::from_headers(
            &headers("5000", "-9223372036854775808", "1300"),
            1000,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { name: HEADER_REMAINING, .. }));
    }

    #[test]
    fn extreme_status_reset_saturates() {
        let rate = RateResource {
            limit: 60,
            used: 0,
            remaining: 60,
            reset: i64::MIN,
        };
        let state = RateLimitState::from_status(&rate, 1_700_000_000);
        assert_eq!(state.reset_in_sec, i64::MIN);
        let ancient = RateLimitState {
            last_update: i64::MIN,
            ..state
        };
        assert!(ancient.is_stale(i64::MAX, 60));
    }

    #[test]
    fn staleness_is_strictly_greater_than_max_age() {
        let state = RateLimitState::from_headers(&headers("1", "0", "0"), 100).unwrap();
        assert!(state.is_exhausted());
        assert!(!state.is_stale(160, 60));
        assert!(state.is_stale(161, 60));
    }
}
