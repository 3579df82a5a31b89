//! Fetch/extract pipeline
//!
//! This module contains the two-tier pipeline, including:
//! - Fixed-delay retries around every network call
//! - Bounded worker pools for postal codes and result links
//! - Candidate page fetching and contact extraction
//! - Search dispatch per postal code

mod dispatcher;
mod driver;
mod extractor;
mod fetcher;
mod link;
mod pool;
mod retry;
mod search;

pub use dispatcher::SearchDispatcher;
pub use driver::PipelineDriver;
pub use extractor::{render_scan_text, ContactExtractor, ExtractedContacts};
pub use fetcher::{build_page_client, FetchedPage, PageFetcher};
pub use link::LinkProcessor;
pub use pool::{TaskFailure, WorkerPool};
pub use retry::RetryPolicy;
pub use search::{parse_result_links, SearchClient, SearchRequest};

use crate::config::Config;
use crate::output::CsvSink;
use crate::postal::PostalCodeDirectory;
use crate::state::DomainRegistry;
use crate::HarvestError;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for one search request
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared services and workers for one run
pub struct Pipeline {
    pub registry: Arc<DomainRegistry>,
    pub sink: Arc<CsvSink>,
    pub dispatcher: Arc<SearchDispatcher>,
    pub driver: PipelineDriver,
}

impl Pipeline {
    /// Wires up clients, shared state and both worker pools from `config`
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let delay = config.retry.delay();
        let page_client = build_page_client(&config.fetcher)?;
        let search_client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()?;

        let registry = Arc::new(DomainRegistry::new());
        let sink = Arc::new(CsvSink::new(&config.output.csv_path));

        let fetcher = PageFetcher::with_client(
            page_client,
            RetryPolicy::new(config.retry.fetch_attempts, delay),
        );
        let links = Arc::new(LinkProcessor::new(
            fetcher,
            Arc::clone(&registry),
            Arc::clone(&sink),
            RetryPolicy::new(config.retry.link_attempts, delay),
            config.pipeline.excluded_extensions.clone(),
        ));
        let dispatcher = Arc::new(SearchDispatcher::new(
            SearchClient::new(search_client, config.search.clone()),
            links,
            config.pipeline.link_workers,
            RetryPolicy::new(config.retry.search_attempts, delay),
        ));
        let driver = PipelineDriver::new(
            Arc::clone(&dispatcher),
            config.pipeline.postal_code_workers,
        );

        Ok(Self {
            registry,
            sink,
            dispatcher,
            driver,
        })
    }
}

/// Runs a complete pipeline over every postal code
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `postal_codes` - The loaded reference data
///
/// # Returns
///
/// * `Ok(())` - Every postal code was processed (individual failures are logged)
/// * `Err(HarvestError)` - The HTTP clients could not be built
pub async fn run_pipeline(
    config: &Config,
    postal_codes: PostalCodeDirectory,
) -> Result<(), HarvestError> {
    let pipeline = Pipeline::from_config(config)?;
    tracing::info!("Appending records to {}", pipeline.sink.path().display());

    pipeline.driver.run(postal_codes.into_iter().collect()).await;

    tracing::info!("{} domains fetched during this run", pipeline.registry.len());
    Ok(())
}
