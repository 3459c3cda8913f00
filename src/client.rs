// src/client.rs

//! HTTP transport
//!
//! Scrapers and downloaders talk to the network through the [`Transport`]
//! trait so they can be driven by an in-memory fake in tests. [`HttpClient`]
//! is the real implementation, a thin wrapper around a blocking reqwest
//! client with browser-like default headers and retry on connection errors.

use crate::config::HttpSection;
use crate::error::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::io::Read;
use std::time::Duration;
use tracing::{debug, warn};

/// Browser user agent; Instagram serves a login wall to obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Linear back-off step between retries
const RETRY_DELAY_MS: u64 = 1000;

/// TCP keepalive interval for uncapped video transfers
const TCP_KEEPALIVE_SECS: u64 = 60;

/// A response body being streamed from a remote server
pub struct RemoteBody {
    /// Value of `content-length`, when the server sent one
    pub content_length: Option<u64>,
    pub reader: Box<dyn Read + Send>,
}

impl std::fmt::Debug for RemoteBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Minimal GET-only transport
pub trait Transport: Send + Sync {
    /// Fetch a page and return its body as text
    fn get_text(&self, url: &str) -> Result<String>;

    /// Start a streaming download
    fn open(&self, url: &str) -> Result<RemoteBody>;
}

/// reqwest-backed transport
pub struct HttpClient {
    client: Client,
    page_timeout: Duration,
    download_timeout: Option<Duration>,
    max_retries: u32,
}

impl HttpClient {
    /// Build a client from the `[http]` configuration section
    pub fn new(config: &HttpSection) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::InitError(format!("Invalid user agent: {e}")))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| Error::InitError(format!("Invalid accept-language: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.page_timeout_secs))
            .tcp_keepalive(Duration::from_secs(TCP_KEEPALIVE_SECS))
            .timeout(None)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            download_timeout: config.download_timeout_secs.map(Duration::from_secs),
            max_retries: config.max_retries.max(1),
        })
    }

    /// Send a request, retrying only when no response was received
    fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match build(&self.client).send() {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(Error::Http {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::Network(format!(
                            "Failed to fetch {url} after {attempt} attempt(s): {e}"
                        )));
                    }
                    warn!("Request attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }
}

impl Transport for HttpClient {
    fn get_text(&self, url: &str) -> Result<String> {
        debug!("Fetching page {}", url);
        let response =
            self.send_with_retry(url, |client| client.get(url).timeout(self.page_timeout))?;
        response
            .text()
            .map_err(|e| Error::Network(format!("Failed to read response from {url}: {e}")))
    }

    fn open(&self, url: &str) -> Result<RemoteBody> {
        debug!("Opening download stream {}", url);
        let response = self.send_with_retry(url, |client| match self.download_timeout {
            Some(limit) => client.get(url).timeout(limit),
            None => client.get(url),
        })?;
        Ok(RemoteBody {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}
