//! Per-link processing: filter, claim, fetch, extract, persist

use crate::output::{ContactRecord, CsvSink};
use crate::pipeline::extractor::ContactExtractor;
use crate::pipeline::fetcher::PageFetcher;
use crate::pipeline::retry::RetryPolicy;
use crate::state::DomainRegistry;
use crate::url::{is_excluded_document, parse_candidate_url};
use crate::HarvestError;
use std::sync::Arc;

/// Turns one search result link into at most one contact record
///
/// Steps, in order:
/// 1. Links to excluded documents (e.g. `.pdf`) are dropped without any request
/// 2. Malformed links are dropped
/// 3. The link's domain is claimed; an already claimed domain is dropped
/// 4. The page is fetched, with an outer retry loop around the fetcher's own
/// 5. Phones and emails are extracted from the body
/// 6. If anything was found, a record is appended to the sink and returned
///
/// A claimed domain stays claimed even if the fetch fails or the page has no
/// contacts.
#[derive(Debug, Clone)]
pub struct LinkProcessor {
    fetcher: PageFetcher,
    extractor: ContactExtractor,
    registry: Arc<DomainRegistry>,
    sink: Arc<CsvSink>,
    retry: RetryPolicy,
    excluded_extensions: Vec<String>,
}

impl LinkProcessor {
    pub fn new(
        fetcher: PageFetcher,
        registry: Arc<DomainRegistry>,
        sink: Arc<CsvSink>,
        retry: RetryPolicy,
        excluded_extensions: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor: ContactExtractor::new(),
            registry,
            sink,
            retry,
            excluded_extensions,
        }
    }

    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    /// Processes one link found for `postal_code`
    ///
    /// # Returns
    ///
    /// * `Ok(vec![record])` - Contacts were found and appended to the sink
    /// * `Ok(vec![])` - The link was skipped, unreachable, or had no contacts
    /// * `Err(HarvestError::Output)` - The record could not be written
    pub async fn process(
        &self,
        link: &str,
        commune: &str,
        postal_code: &str,
    ) -> Result<Vec<ContactRecord>, HarvestError> {
        let link = link.trim();

        if is_excluded_document(link, &self.excluded_extensions) {
            tracing::debug!("Skipping document link {}", link);
            return Ok(Vec::new());
        }

        let url = match parse_candidate_url(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping malformed link {}: {}", link, e);
                return Ok(Vec::new());
            }
        };

        if !self.registry.try_claim(&url) {
            tracing::debug!("Domain already processed, skipping {}", link);
            return Ok(Vec::new());
        }

        tracing::info!("Fetching {}", link);

        let label = format!("page {}", link);
        let page = match self
            .retry
            .run_if(&label, |_| self.fetcher.fetch(&url), HarvestError::is_transient)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Could not retrieve {}: {}", link, e);
                return Ok(Vec::new());
            }
        };

        if !page.is_success() {
            tracing::debug!("{} answered HTTP {}", link, page.status_code);
        }

        let contacts = self.extractor.extract(&page.body);
        tracing::debug!(
            "{}: {} phone numbers, {} email addresses",
            link,
            contacts.phone_numbers.len(),
            contacts.email_addresses.len()
        );

        let Some(record) = ContactRecord::new(
            link,
            commune,
            postal_code,
            contacts.phone_numbers,
            contacts.email_addresses,
        ) else {
            return Ok(Vec::new());
        };

        self.sink.append(&record)?;
        tracing::info!(
            "Recorded contacts for {} ({} {})",
            link,
            postal_code,
            commune
        );

        Ok(vec![record])
    }
}
