//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - GET requests returning the page body
//! - Error classification into a single transport error
//!
//! There is no retry at this layer; the scheduler owns the retry policy.

use crate::config::Config;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCause {
    /// The request exceeded the configured timeout
    Timeout,
    /// The connection could not be established
    Connect(String),
    /// The server answered with a non-2xx status
    Status(u16),
    /// Any other transport failure (TLS, body decoding, ...)
    Other(String),
}

impl fmt::Display for TransportCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

/// A failed fetch, carrying the URL and the underlying cause
#[derive(Debug, Clone, Error)]
#[error("Request to {url} failed: {cause}")]
pub struct TransportError {
    pub url: String,
    pub cause: TransportCause,
}

impl TransportError {
    fn new(url: &Url, cause: TransportCause) -> Self {
        Self {
            url: url.to_string(),
            cause,
        }
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let cause = if error.is_timeout() {
            TransportCause::Timeout
        } else if error.is_connect() {
            TransportCause::Connect(error.to_string())
        } else if let Some(status) = error.status() {
            TransportCause::Status(status.as_u16())
        } else {
            TransportCause::Other(error.to_string())
        };
        Self::new(url, cause)
    }

    /// Whether a later attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self.cause {
            TransportCause::Timeout | TransportCause::Connect(_) => true,
            TransportCause::Status(code) => code == 429 || code >= 500,
            TransportCause::Other(_) => false,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use casa_ripple::config::Config;
/// use casa_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = config.crawler.request_timeout();

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs GET requests and returns raw page content
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the crawl configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a URL, returning the body of a 2xx response
    ///
    /// Timeout, connection refusal, and non-2xx status all surface as a
    /// `TransportError` carrying the URL and cause.
    pub async fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                url,
                TransportCause::Status(status.as_u16()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))
    }
}
