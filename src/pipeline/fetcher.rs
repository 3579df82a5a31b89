//! HTTP fetcher for candidate pages
//!
//! This module handles page requests for the pipeline, including:
//! - Building the HTTP client with a browser-like user agent
//! - Relaxed TLS verification and a short per-request timeout
//! - Retrying transport failures with a fixed pause

use crate::config::FetcherConfig;
use crate::pipeline::retry::RetryPolicy;
use crate::HarvestError;
use reqwest::Client;
use url::Url;

/// A fetched candidate page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Builds the HTTP client used for candidate pages
///
/// # Arguments
///
/// * `config` - User agent, timeout and TLS settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use contact_harvest::config::FetcherConfig;
/// use contact_harvest::pipeline::build_page_client;
///
/// let client = build_page_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_page_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .danger_accept_invalid_certs(!config.verify_tls)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches candidate pages with bounded retries
///
/// Any transport failure (connection refused, timeout, reset, body read
/// error) is retried according to the policy. The HTTP status is returned
/// to the caller untouched; it is not a reason to retry here.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl PageFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &FetcherConfig, retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_page_client(config)?, retry))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetches `url`, retrying transport failures
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - A response was received, whatever its status
    /// * `Err(HarvestError::Http)` - Every attempt failed at the transport level
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, HarvestError> {
        let label = format!("GET {}", url);

        self.retry
            .run_if(
                &label,
                |attempt| async move {
                    tracing::trace!("Fetching {} (attempt {})", url, attempt);
                    self.fetch_once(url).await
                },
                HarvestError::is_transient,
            )
            .await
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, HarvestError> {
        let http_error = |source: reqwest::Error| HarvestError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(http_error)?;

        Ok(FetchedPage {
            status_code,
            body,
        })
    }
}
