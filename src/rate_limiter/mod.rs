use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Spaces out requests so a channel never sees them faster than `delay` apart
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.ready_at() {
            sleep_until(ready_at).await;
        }
        self.last_request = Some(Instant::now());
    }

    fn ready_at(&self) -> Option<Instant> {
        self.last_request.map(|last| last + self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_immediate() {
        let mut limiter = RateLimiter::new(1000);
        let start = Instant::now();

        limiter.wait().await;

        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_following_requests_are_spaced() {
        let mut limiter = RateLimiter::new(1000);
        let start = Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}
