use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::time::Duration;

/// HTTP client with built-in rate limiting
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// POST `body` as JSON with extra `headers` and fail on non-success status
    pub async fn post_json<T: Serialize + ?Sized>(
        &mut self,
        url: &str,
        headers: &[(&'static str, &str)],
        body: &T,
    ) -> Result<reqwest::Response> {
        self.rate_limiter.wait().await;

        let response = self
            .client
            .post(url)
            .headers(Self::build_headers(headers)?)
            .json(body)
            .send()
            .await
            .context("Failed to send POST request")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Request returned status {}: {}", status, truncate(&text, 200));
        }

        Ok(response)
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    fn build_headers(headers: &[(&'static str, &str)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for &(name, value) in headers {
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name))?;
            map.insert(HeaderName::from_static(name), value);
        }
        Ok(map)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
