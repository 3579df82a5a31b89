//! Top-level iteration over postal codes

use crate::pipeline::dispatcher::SearchDispatcher;
use crate::pipeline::pool::WorkerPool;
use crate::postal::PostalCodeEntry;
use std::sync::Arc;

/// Dispatches one search per postal code through the outer pool
///
/// The default width of 1 processes postal codes strictly one after the
/// other; a failure on one postal code never stops the others.
#[derive(Debug, Clone)]
pub struct PipelineDriver {
    dispatcher: Arc<SearchDispatcher>,
    pool: WorkerPool,
}

impl PipelineDriver {
    pub fn new(dispatcher: Arc<SearchDispatcher>, postal_code_workers: usize) -> Self {
        Self {
            dispatcher,
            pool: WorkerPool::new("postal code", postal_code_workers),
        }
    }

    /// Runs every entry to completion
    ///
    /// All output is written by the link workers; nothing is returned.
    pub async fn run(&self, entries: Vec<PostalCodeEntry>) {
        let total = entries.len();
        tracing::info!(
            "Dispatching {} postal codes ({} at a time)",
            total,
            self.pool.width()
        );

        let outcomes = self
            .pool
            .run_all(entries, |entry| {
                let dispatcher = Arc::clone(&self.dispatcher);
                async move { dispatcher.dispatch(&entry).await.len() }
            })
            .await;

        let mut records = 0;
        for (entry, outcome) in outcomes {
            match outcome {
                Ok(found) => {
                    tracing::debug!("Postal code {} produced {} records", entry.postal_code, found);
                    records += found;
                }
                Err(failure) => tracing::error!(
                    "{} generated an exception: {}",
                    entry.postal_code,
                    failure
                ),
            }
        }

        tracing::info!(
            "Pipeline finished: {} postal codes, {} new records",
            total,
            records
        );
    }
}
