use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Runtime configuration for the GitHub fetch client.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Age after which a cached rate-limit snapshot is refreshed before use.
    pub rate_limit_max_age_sec: i64,
    /// Extra margin slept on top of the reported reset time.
    pub rate_limit_buffer_sec: i64,
    pub max_retries: u32,
    /// Flat delay before every request, retries included.
    pub request_delay: Duration,
}

impl Config {
    /// Config with every tunable at its default.
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: api_url.into(),
            api_version: "2022-11-28".to_string(),
            user_agent: default_user_agent(),
            timeout_secs: 30,
            rate_limit_max_age_sec: 60,
            rate_limit_buffer_sec: 5,
            max_retries: 5,
            request_delay: Duration::from_millis(1000),
        }
    }

    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - GITHUB_TOKEN (or GH_TOKEN) [required]
    /// - GITHUB_API_URL (default: https://api.github.com)
    /// - GITHUB_API_VERSION (default: 2022-11-28)
    /// - GITHUB_HTTP_TIMEOUT_SECS (default: 30)
    /// - GITHUB_USER_AGENT (default: github-fetch/<version>)
    /// - GITHUB_RATE_LIMIT_MAX_AGE_SECS (default: 60)
    /// - GITHUB_RATE_LIMIT_BUFFER_SECS (default: 5)
    /// - GITHUB_MAX_RETRIES (default: 5)
    /// - GITHUB_REQUEST_DELAY_MS (default: 1000)
    pub fn from_env() -> Result<Self, String> {
        let token = env::var("GITHUB_TOKEN")
            .or_else(|_| env::var("GH_TOKEN"))
            .map_err(|_| "Missing GITHUB_TOKEN or GH_TOKEN".to_string())?;
        let api_url = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mut cfg = Self::new(token, api_url.trim_end_matches('/'));
        if let Ok(v) = env::var("GITHUB_API_VERSION") {
            cfg.api_version = v;
        }
        if let Ok(v) = env::var("GITHUB_USER_AGENT") {
            cfg.user_agent = v;
        }
        cfg.timeout_secs = parse_env("GITHUB_HTTP_TIMEOUT_SECS").unwrap_or(cfg.timeout_secs);
        cfg.rate_limit_max_age_sec =
            parse_env("GITHUB_RATE_LIMIT_MAX_AGE_SECS").unwrap_or(cfg.rate_limit_max_age_sec);
        cfg.rate_limit_buffer_sec =
            parse_env("GITHUB_RATE_LIMIT_BUFFER_SECS").unwrap_or(cfg.rate_limit_buffer_sec);
        cfg.max_retries = parse_env("GITHUB_MAX_RETRIES").unwrap_or(cfg.max_retries);
        if let Some(ms) = parse_env::<u64>("GITHUB_REQUEST_DELAY_MS") {
            cfg.request_delay = Duration::from_millis(ms);
        }
        Ok(cfg)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn default_user_agent() -> String {
    format!("github-fetch/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let cfg = Config::new("t", "http://localhost:1");
        assert_eq!(cfg.token, "t");
        assert_eq!(cfg.api_url, "http://localhost:1");
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.rate_limit_max_age_sec, 60);
        assert_eq!(cfg.rate_limit_buffer_sec, 5);
        assert_eq!(cfg.request_delay, Duration::from_secs(1));
        assert!(cfg.user_agent.starts_with("github-fetch/"));
    }
}
