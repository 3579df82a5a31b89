//! Per-postal-code search and fan-out to link workers

use crate::output::ContactRecord;
use crate::pipeline::link::LinkProcessor;
use crate::pipeline::pool::WorkerPool;
use crate::pipeline::retry::RetryPolicy;
use crate::pipeline::search::{parse_result_links, SearchClient};
use crate::postal::PostalCodeEntry;
use crate::HarvestError;
use std::sync::Arc;

/// Runs the search for one postal code and processes every result link
///
/// The search is retried on transport failures and non-success statuses.
/// Result links are handed to the link pool; a failing or panicking link
/// task is logged and contributes nothing, without disturbing its siblings.
#[derive(Debug, Clone)]
pub struct SearchDispatcher {
    search: SearchClient,
    links: Arc<LinkProcessor>,
    pool: WorkerPool,
    retry: RetryPolicy,
}

impl SearchDispatcher {
    pub fn new(
        search: SearchClient,
        links: Arc<LinkProcessor>,
        link_workers: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            search,
            links,
            pool: WorkerPool::new("link", link_workers),
            retry,
        }
    }

    /// Searches for `entry` and returns every record its links produced
    ///
    /// Returns an empty list when the search fails on every attempt or its
    /// response cannot be parsed.
    pub async fn dispatch(&self, entry: &PostalCodeEntry) -> Vec<ContactRecord> {
        tracing::info!(
            "Searching postal code {} ({})",
            entry.postal_code,
            entry.commune_name
        );

        let links = match self.search_links(&entry.postal_code).await {
            Ok(links) => links,
            Err(e) => {
                tracing::error!("Search failed for postal code {}: {}", entry.postal_code, e);
                return Vec::new();
            }
        };

        tracing::info!(
            "{} result links for postal code {}",
            links.len(),
            entry.postal_code
        );

        let outcomes = self
            .pool
            .run_all(links, |link| {
                let processor = Arc::clone(&self.links);
                let commune = entry.commune_name.clone();
                let postal_code = entry.postal_code.clone();
                async move { processor.process(&link, &commune, &postal_code).await }
            })
            .await;

        let mut records = Vec::new();
        for (link, outcome) in outcomes {
            match outcome {
                Ok(Ok(found)) => records.extend(found),
                Ok(Err(e)) => tracing::error!("{} generated an error: {}", link, e),
                Err(failure) => tracing::error!("{} generated an exception: {}", link, failure),
            }
        }

        records
    }

    async fn search_links(&self, postal_code: &str) -> Result<Vec<String>, HarvestError> {
        let request = self.search.build_request(postal_code);
        let label = format!("search {}", request.q);

        let body = self
            .retry
            .run_if(&label, |_| self.search.send(&request), HarvestError::is_transient)
            .await?;

        parse_result_links(&body)
    }
}
