//! Wall-clock and sleeping, behind a trait so waits can be simulated.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Current UTC time in epoch seconds.
    fn now_epoch(&self) -> i64;

    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by `chrono` and `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_epoch(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Simulated clock: `sleep` returns immediately and advances time instead.
///
/// Clones share the same time and sleep log, so a test can keep a handle
/// while the client owns another.
#[derive(Debug, Clone)]
pub struct MockClock {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug)]
struct MockState {
    now: Duration,
    sleeps: Vec<Duration>,
}

impl MockClock {
    pub fn new(start_epoch: i64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                now: Duration::from_secs(start_epoch.max(0) as u64),
                sleeps: Vec::new(),
            })),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.lock().now += duration;
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.lock().sleeps.iter().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only happens after a panicking test thread.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now_epoch(&self) -> i64 {
        self.lock().now.as_secs() as i64
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.lock();
        state.now += duration;
        state.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_clock_advances_on_sleep() {
        let clock = MockClock::new(1_000);
        let handle = clock.clone();
        clock.sleep(Duration::from_secs(7)).await;
        clock.sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.now_epoch(), 1_007);
        assert_eq!(
            handle.sleeps(),
            vec![Duration::from_secs(7), Duration::from_millis(500)]
        );
        assert_eq!(handle.total_slept(), Duration::from_millis(7_500));
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_epoch() > 1_577_836_800);
    }
}
