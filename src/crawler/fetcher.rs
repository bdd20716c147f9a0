//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests with the politeness pause after every response
//! - Content-based encoding detection of response bodies
//! - Error classification (timeout, HTTP status, other network faults)

use crate::config::{Config, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use crate::ScrapeError;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// Decoded page body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// `timeout` bounds connection establishment and the whole response wait.
///
/// # Example
///
/// ```no_run
/// use gourmet_scout::config::UserAgentConfig;
/// use gourmet_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sequential, throttled page fetcher
///
/// Takes `&mut self` so that two fetches can never overlap.
pub struct Fetcher {
    client: Client,
    timeout: Duration,
    throttle: Throttle,
    requests: u64,
}

impl Fetcher {
    /// Creates a fetcher from the `[fetcher]` and `[user-agent]` sections
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        Self::with_settings(
            &config.user_agent,
            config.fetcher.timeout(),
            config.fetcher.politeness_delay(),
        )
    }

    /// Creates a fetcher with explicit timeout and politeness delay
    pub fn with_settings(
        user_agent: &UserAgentConfig,
        timeout: Duration,
        politeness_delay: Duration,
    ) -> Result<Self, ScrapeError> {
        let client = build_http_client(user_agent, timeout)?;
        Ok(Self {
            client,
            timeout,
            throttle: Throttle::new(politeness_delay),
            requests: 0,
        })
    }

    /// Fetches a URL and decodes its body
    ///
    /// # Request Flow
    ///
    /// 1. Send GET (bounded by the timeout)
    /// 2. Read the body
    /// 3. Pause for the politeness delay, once, whatever the status
    /// 4. Reject non-2xx statuses
    /// 5. Decode the body using content-based detection
    ///
    /// | Condition | Result | Pause |
    /// |-----------|--------|-------|
    /// | 2xx | `FetchedPage` | yes |
    /// | other status | `ScrapeError::Http` | yes |
    /// | timeout | `ScrapeError::ConnectTimeout` | no |
    /// | other transport fault | `ScrapeError::Network` | no |
    pub async fn fetch(&mut self, url: &str) -> Result<FetchedPage, ScrapeError> {
        self.requests += 1;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let bytes = response.bytes().await;

        self.throttle.pause().await;

        let bytes = bytes.map_err(|e| self.classify_error(url, e))?;

        if !status.is_success() {
            tracing::debug!("{} answered HTTP {}", url, status.as_u16());
            return Err(ScrapeError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let (body, encoding) = decode_body(&bytes);
        tracing::debug!(
            "Fetched {} ({} bytes, {})",
            final_url,
            bytes.len(),
            encoding.name()
        );

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }

    /// Number of requests attempted
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Number of politeness pauses taken
    pub fn pauses(&self) -> u64 {
        self.throttle.pauses()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pause taken after every completed request
    pub fn politeness_delay(&self) -> Duration {
        self.throttle.delay()
    }

    fn classify_error(&self, url: &str, error: reqwest::Error) -> ScrapeError {
        if error.is_timeout() {
            ScrapeError::ConnectTimeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else if error.is_connect() {
            ScrapeError::Network {
                url: url.to_string(),
                message: format!("Connection failed: {}", error),
            }
        } else {
            ScrapeError::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Decodes a body by inspecting its bytes rather than the declared charset
///
/// A byte-order mark wins; otherwise the encoding is guessed from the whole
/// body. Undecodable sequences become U+FFFD.
pub fn decode_body(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return (text.into_owned(), encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    (text.into_owned(), encoding)
}
