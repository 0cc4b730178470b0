//! Resilient page fetching over an unreliable network.
//!
//! A [`PageFetcher`] is one bounded scraping session: headers and proxy are
//! fixed for its lifetime and the underlying connection pool is released when
//! it is dropped. Network failure never escapes [`PageFetcher::fetch_page`];
//! every outcome other than a 200 body collapses to `None` after the retry
//! policy has been applied, so callers need no error handling for network
//! conditions.

use crate::domain::model::ProxyConfig;
use crate::utils::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGES: &str = "de,en-US;q=0.7,en;q=0.3";

/// Retry/backoff/timeout policy applied per `fetch_page` call.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub initial_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout: Duration::from_secs(30),
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// One scoped network session with browser-like identity headers and an
/// optional proxy, both fixed for the session's lifetime.
pub struct PageFetcher {
    client: Client,
    policy: FetchPolicy,
}

impl PageFetcher {
    pub fn new(policy: FetchPolicy, proxy: Option<&ProxyConfig>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGES));

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(policy.request_timeout);

        if let Some(proxy) = proxy {
            let mut upstream =
                reqwest::Proxy::all(format!("http://{}:{}", proxy.host, proxy.port))?;
            if let (Some(username), Some(password)) = (&proxy.username, &proxy.password) {
                upstream = upstream.basic_auth(username, password);
            }
            builder = builder.proxy(upstream);
        }

        Ok(Self {
            client: builder.build()?,
            policy,
        })
    }

    /// Fetch a page body, retrying rate limits and timeouts with doubling
    /// backoff up to the attempt budget. Any other failure is non-retryable
    /// and returns `None` immediately.
    pub async fn fetch_page(&self, url: &str) -> Option<String> {
        let mut retry_delay = self.policy.initial_backoff;

        for attempt in 1..=self.policy.max_attempts {
            match self.client.get(url).send().await {
                Ok(response) => match response.status() {
                    StatusCode::OK => {
                        return match response.text().await {
                            Ok(body) => Some(body),
                            Err(err) => {
                                tracing::error!(url, error = %err, "failed to read response body");
                                None
                            }
                        };
                    }
                    StatusCode::TOO_MANY_REQUESTS => {
                        retry_delay *= 2;
                        tracing::warn!(
                            url,
                            wait_ms = retry_delay.as_millis() as u64,
                            "rate limited, backing off before retry"
                        );
                        tokio::time::sleep(retry_delay).await;
                    }
                    status => {
                        tracing::error!(url, status = %status, "unexpected HTTP status");
                        return None;
                    }
                },
                Err(err) if err.is_timeout() => {
                    tracing::warn!(url, attempt, "request timed out");
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(retry_delay).await;
                        retry_delay *= 2;
                    }
                }
                Err(err) => {
                    tracing::error!(url, error = %err, "request failed");
                    return None;
                }
            }
        }

        tracing::warn!(
            url,
            attempts = self.policy.max_attempts,
            "retry budget exhausted"
        );
        None
    }
}
