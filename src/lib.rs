//! Contact-Harvest: a postal-code driven contact finder
//!
//! This crate queries a search service once per French postal code, fetches
//! the candidate pages it returns, extracts phone numbers and email addresses
//! from them, and appends the findings to a CSV file.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod postal;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Search service returned HTTP {status} for query {query}")]
    SearchStatus { query: String, status: u16 },

    #[error("Malformed response from {origin}: {message}")]
    MalformedResponse { origin: String, message: String },

    #[error("Failed to load postal codes from {source_name}: {message}")]
    PostalCodes {
        source_name: String,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

impl HarvestError {
    /// Returns true for failures worth another attempt (connection errors,
    /// timeouts, non-success search responses)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { source, .. } | Self::Reqwest(source) => !source.is_builder(),
            Self::SearchStatus { .. } => true,
            _ => false,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Contact-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{ContactRecord, CsvSink};
pub use pipeline::{run_pipeline, LinkProcessor, Pipeline, PipelineDriver, SearchDispatcher};
pub use postal::{PostalCodeDirectory, PostalCodeEntry};
pub use state::DomainRegistry;
pub use crate::url::{extract_domain, is_excluded_document, parse_candidate_url};
