//! In-memory transport for unit tests.

use super::{RawResponse, Transport};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Per-URL queues of canned responses. The last response queued for a URL
/// is repeated once the queue drains to it.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    routes: HashMap<String, VecDeque<RawResponse>>,
    requests: Vec<String>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, url: &str, response: RawResponse) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .routes
            .entry(url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn hits(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, _headers: &HeaderMap) -> Result<RawResponse> {
        let mut script = self.inner.lock().unwrap();
        script.requests.push(url.to_string());
        let queue = script
            .routes
            .get_mut(url)
            .unwrap_or_else(|| panic!("no scripted response for {}", url));
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };
        Ok(response)
    }
}

/// Response carrying the rate-limit header triple.
pub(crate) fn response(
    status: u16,
    remaining: i64,
    reset: i64,
    body: serde_json::Value,
) -> RawResponse {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from(5000));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset));
    RawResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers,
        body: body.to_string(),
    }
}

pub(crate) fn with_header(mut response: RawResponse, name: &str, value: &str) -> RawResponse {
    response.headers.insert(
        HeaderName::from_bytes(name.as_bytes()).unwrap(),
        HeaderValue::from_str(value).unwrap(),
    );
    response
}

/// `/rate_limit` body.
pub(crate) fn status_response(remaining: i64, reset: i64) -> RawResponse {
    response(
        200,
        remaining,
        reset,
        serde_json::json!({
            "rate": {"limit": 5000, "used": 5000 - remaining, "remaining": remaining, "reset": reset}
        }),
    )
}
