use super::{GitHubClient, TAG};
use crate::clock::Clock;
use crate::error::{FetchError, Result};
use crate::http::Transport;
use crate::rate_limit::{RateLimitResponse, RateLimitState};
use chrono::{DateTime, Local, Utc};
use log::{debug, warn};
use reqwest::StatusCode;
use std::time::Duration;

impl<T: Transport, C: Clock> GitHubClient<T, C> {
    /// Replace the quota snapshot with a fresh one from `/rate_limit`.
    pub async fn refresh_rate_limit(&mut self) -> Result<RateLimitState> {
        let url = self.url("/rate_limit");
        let res = self.transport.get(&url, &self.default_headers).await?;
        if res.status != StatusCode::OK {
            return Err(FetchError::RateLimitStatus { status: res.status });
        }
        let body: RateLimitResponse = serde_json::from_str(&res.body)?;
        let state = RateLimitState::from_status(&body.rate, self.clock.now_epoch());
        debug!(
            target: TAG,
            "Rate limit status: {}/{} remaining, resets in {}s.",
            state.remaining, state.limit, state.reset_in_sec
        );
        self.rate = Some(state);
        Ok(state)
    }

    async fn current_rate_limit(&mut self) -> Result<RateLimitState> {
        match self.rate {
            Some(state) => Ok(state),
            None => self.refresh_rate_limit().await,
        }
    }

    /// Whether the snapshot is older than `rate_limit_max_age_sec`.
    /// Fetches the first snapshot if none exists yet.
    pub async fn is_rate_limit_stale(&mut self) -> Result<bool> {
        let state = self.current_rate_limit().await?;
        Ok(state.is_stale(
            self.clock.now_epoch(),
            self.cfg.rate_limit_max_age_sec,
        ))
    }

    /// Current quota snapshot, refreshed when `force` is set or when it is
    /// stale and `ignore_stale` is not.
    pub async fn rate_limit_status(
        &mut self,
        force: bool,
        ignore_stale: bool,
    ) -> Result<RateLimitState> {
        if force {
            return self.refresh_rate_limit().await;
        }
        if self.is_rate_limit_stale().await? && !ignore_stale {
            return self.refresh_rate_limit().await;
        }
        self.current_rate_limit().await
    }

    pub async fn is_rate_limited(&mut self, force: bool, ignore_stale: bool) -> Result<bool> {
        Ok(self
            .rate_limit_status(force, ignore_stale)
            .await?
            .is_exhausted())
    }

    /// Block until the quota window resets, plus the configured buffer.
    ///
    /// The sleep length comes from the snapshot taken before sleeping; the
    /// snapshot is refreshed again on wake-up.
    pub async fn wait_for_reset(&mut self) -> Result<()> {
        let state = if self.is_rate_limit_stale().await? {
            self.refresh_rate_limit().await?
        } else {
            self.current_rate_limit().await?
        };
        let sleep_sec = state
            .reset_in_sec
            .saturating_add(self.cfg.rate_limit_buffer_sec)
            .max(0);
        let wakeup_epoch = self.clock.now_epoch().saturating_add(sleep_sec);
        let wakeup = DateTime::<Utc>::from_timestamp(wakeup_epoch, 0)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        warn!(
            target: TAG,
            "Rate limit reached - sleeping for {}s until {}.",
            sleep_sec, wakeup
        );
        self.clock.sleep(Duration::from_secs(sleep_sec as u64)).await;
        self.refresh_rate_limit().await?;
        Ok(())
    }
}
