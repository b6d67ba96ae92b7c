//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client
//! - Classifying transport errors into transient and unexpected failures
//! - The retry combinator wrapped around every page and image fetch
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Timeout | Retry, up to `max_attempts` in total |
//! | Connection failure / cut mid-stream | Retry, up to `max_attempts` in total |
//! | Page answered with non-2xx | Immediate give-up ("gone") |
//! | Anything else | Propagates as `CrawlError` |
//!
//! Give-ups are logged and surface as `Ok(None)`; only the last row ever
//! reaches the caller as an error.
//!
//! The default policy does not retry back to back: it waits
//! `retry_backoff * n` after failed attempt `n`. Use
//! [`RetryPolicy::immediate`] for back-to-back retries.

use crate::config::HttpConfig;
use crate::crawler::scheduler::Sleeper;
use crate::CrawlError;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Result of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The attempt produced a value
    Success(T),

    /// The attempt failed in a way worth retrying (timeout, dropped connection)
    Transient(String),

    /// The resource is not coming back (e.g. the thread was pruned)
    Permanent(String),
}

impl<T> FetchOutcome<T> {
    /// Maps the success value, leaving failures untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        self.and_then(|value| FetchOutcome::Success(f(value)))
    }

    /// Chains a fallible step onto the success value
    pub fn and_then<U>(self, f: impl FnOnce(T) -> FetchOutcome<U>) -> FetchOutcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Transient(reason) => FetchOutcome::Transient(reason),
            Self::Permanent(reason) => FetchOutcome::Permanent(reason),
        }
    }
}

/// A response received from the server, whatever its status
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status: StatusCode,

    /// Response body
    pub body: Vec<u8>,
}

impl Fetched {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// How many times to try a fetch and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,

    /// Delay after attempt `n` is `backoff * n`
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Retries back to back, without any delay
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Delay to wait after the failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self::new(config.max_attempts, config.retry_backoff)
    }
}

/// Runs `op` until it succeeds, fails permanently, or runs out of attempts
///
/// # Arguments
///
/// * `policy` - Attempt bound and backoff
/// * `sleeper` - Used to wait between attempts
/// * `label` - What is being fetched, for log lines
/// * `op` - One attempt; `Err` means an unexpected failure
///
/// # Returns
///
/// * `Ok(Some(value))` - An attempt succeeded
/// * `Ok(None)` - Gave up, either on a permanent failure or after the last
///   transient one; the reason has been logged
/// * `Err(CrawlError)` - An attempt failed unexpectedly; no further attempts
///   are made
pub async fn with_retries<T, F, Fut, Z>(
    policy: &RetryPolicy,
    sleeper: &Z,
    label: &str,
    mut op: F,
) -> Result<Option<T>, CrawlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<FetchOutcome<T>, CrawlError>>,
    Z: Sleeper,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op().await? {
            FetchOutcome::Success(value) => return Ok(Some(value)),
            FetchOutcome::Permanent(reason) => {
                tracing::warn!("{} - too late, it's gone ({})", label, reason);
                return Ok(None);
            }
            FetchOutcome::Transient(reason) => {
                if attempt >= max_attempts {
                    tracing::error!(
                        "{} - epic fail, tried {} times (last error: {})",
                        label,
                        attempt,
                        reason
                    );
                    return Ok(None);
                }

                tracing::warn!(
                    "{} - error on attempt {}/{}: {}",
                    label,
                    attempt,
                    max_attempts,
                    reason
                );

                let delay = policy.delay_after(attempt);
                if !delay.is_zero() {
                    sleeper.sleep(delay).await;
                }
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sorts a transport error into a retryable outcome or an unexpected error
pub fn classify_error<T>(url: &str, error: reqwest::Error) -> Result<FetchOutcome<T>, CrawlError> {
    if error.is_timeout() {
        Ok(FetchOutcome::Transient("request timeout".to_string()))
    } else if error.is_connect() {
        Ok(FetchOutcome::Transient(format!("connection failed: {}", error)))
    } else if error.is_body() || error.is_decode() || error.is_request() {
        Ok(FetchOutcome::Transient(format!("connection cut: {}", error)))
    } else {
        Err(CrawlError::Http {
            url: url.to_string(),
            source: error,
        })
    }
}

/// One network round trip, without retries
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends a GET request and reads the whole body
    ///
    /// Any HTTP response, whatever its status, is a `Success`.
    async fn get(&self, url: &str) -> Result<FetchOutcome<Fetched>, CrawlError>;
}

/// [`Transport`] over a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the transport with a client configured from `config`
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<FetchOutcome<Fetched>, CrawlError> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(url, e),
        };

        let status = response.status();
        let final_url = response.url().to_string();

        match response.bytes().await {
            Ok(body) => Ok(FetchOutcome::Success(Fetched {
                url: final_url,
                status,
                body: body.to_vec(),
            })),
            Err(e) => classify_error(url, e),
        }
    }
}

/// A transport wrapped in the retry policy
///
/// Every network fetch the crawler makes goes through one of these.
#[derive(Debug, Clone)]
pub struct Fetcher<T, Z> {
    transport: T,
    sleeper: Z,
    policy: RetryPolicy,
}

impl<T: Transport, Z: Sleeper> Fetcher<T, Z> {
    pub fn new(transport: T, sleeper: Z, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs an arbitrary attempt under this fetcher's retry policy
    pub async fn retry<V, F, Fut>(&self, label: &str, op: F) -> Result<Option<V>, CrawlError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<FetchOutcome<V>, CrawlError>>,
    {
        with_retries(&self.policy, &self.sleeper, label, op).await
    }

    /// Fetches raw bytes; any HTTP response counts as success
    ///
    /// The caller decides what a non-2xx status means.
    pub async fn get(&self, url: &str) -> Result<Option<Fetched>, CrawlError> {
        let transport = &self.transport;
        self.retry(url, move || async move { transport.get(url).await })
            .await
    }

    /// Fetches a document body; a non-2xx status means the page is gone
    pub async fn get_document(&self, url: &str) -> Result<Option<String>, CrawlError> {
        let transport = &self.transport;
        self.retry(url, move || async move {
            let outcome = transport.get(url).await?;
            Ok::<_, CrawlError>(outcome.and_then(|fetched| {
                if fetched.is_success() {
                    FetchOutcome::Success(fetched.text())
                } else {
                    FetchOutcome::Permanent(format!("HTTP {}", fetched.status))
                }
            }))
        })
        .await
    }
}
