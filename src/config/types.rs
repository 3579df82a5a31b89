use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent with every candidate page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36";

/// Main configuration structure for Contact-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub fetcher: FetcherConfig,
    pub retry: RetryConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    #[serde(rename = "postal-codes")]
    pub postal_codes: PostalCodesConfig,
}

/// Remote search service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Search endpoint receiving the JSON query payload
    pub endpoint: String,

    /// Value of the `X-API-KEY` header
    pub api_key: String,

    /// Fixed phrase quoted in front of the postal code
    pub phrase: String,

    /// Country parameter (`gl`)
    pub country: String,

    /// Interface language parameter (`hl`)
    pub language: String,

    pub autocorrect: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://google.serper.dev/search".to_string(),
            api_key: String::new(),
            phrase: "réalisé par solocal".to_string(),
            country: "fr".to_string(),
            language: "fr".to_string(),
            autocorrect: false,
        }
    }
}

/// Candidate page fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Whether TLS certificates of candidate pages are verified
    pub verify_tls: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 5,
            verify_tls: false,
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry budgets for the network call sites
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Attempts made by the page fetcher for a single fetch
    pub fetch_attempts: u32,

    /// Attempts made by the link processor around the page fetcher
    pub link_attempts: u32,

    /// Attempts made for a single search query
    pub search_attempts: u32,

    /// Fixed pause between attempts (milliseconds)
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            fetch_attempts: 3,
            link_attempts: 3,
            search_attempts: 3,
            delay_ms: 3000,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Worker pool widths and link filtering
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Number of postal codes processed concurrently
    pub postal_code_workers: usize,

    /// Number of result links processed concurrently per postal code
    pub link_workers: usize,

    /// URL suffixes that are never fetched (e.g. ".pdf")
    pub excluded_extensions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            postal_code_workers: 1,
            link_workers: 5,
            excluded_extensions: vec![".pdf".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the CSV file receiving contact records
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "scraped_data_new.csv".to_string(),
        }
    }
}

/// Postal code reference data configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostalCodesConfig {
    /// HTTP(S) URL or local path of the JSON document
    pub source: String,
}

impl Default for PostalCodesConfig {
    fn default() -> Self {
        Self {
            source: "https://unpkg.com/codes-postaux@4.0.0/codes-postaux.json".to_string(),
        }
    }
}
