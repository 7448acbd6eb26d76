//! Provider fan-out with deadlines.
//!
//! Every provider call is bounded by the configured timeout. Failures and
//! timeouts never propagate: they are logged and become an empty list, so
//! one unreachable catalog still leaves the other's results.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::request_delay;
use crate::progress::{ProgressReporter, SearchProgress};
use crate::provider::CatalogProvider;
use crate::types::{ProviderQuery, ProviderRecord, Query};

/// Records gathered from both providers by one fetch.
#[derive(Debug, Default)]
pub struct Fetched {
    /// Modrinth records, in provider order.
    pub modrinth: Vec<ProviderRecord>,
    /// CurseForge records, in provider order.
    pub curseforge: Vec<ProviderRecord>,
}

impl Fetched {
    /// Returns `true` if neither provider returned anything.
    pub fn is_empty(&self) -> bool {
        self.modrinth.is_empty() && self.curseforge.is_empty()
    }
}

/// Run one provider search under `timeout`, mapping any failure to an empty list.
pub async fn search_or_empty<P: CatalogProvider>(
    provider: &P,
    query: &ProviderQuery,
    timeout: Duration,
) -> Vec<ProviderRecord> {
    let name = provider.provider();
    let outcome = match tokio::time::timeout(timeout, provider.search(query)).await {
        Ok(result) => result,
        Err(_) => Err(SearchError::Timeout(format!(
            "{name} did not answer within {}s",
            timeout.as_secs_f64()
        ))),
    };

    match outcome {
        Ok(records) => {
            tracing::debug!(provider = %name, count = records.len(), "provider returned results");
            records
        }
        Err(err) => {
            tracing::warn!(provider = %name, error = %err, "provider query failed");
            Vec::new()
        }
    }
}

/// Query both providers concurrently for the same page.
pub async fn fetch_page<M, C>(
    modrinth: &M,
    curseforge: &C,
    query: &ProviderQuery,
    timeout: Duration,
    progress: &ProgressReporter,
) -> Fetched
where
    M: CatalogProvider,
    C: CatalogProvider,
{
    tracing::trace!(term = ?query.search_term, page = query.page_index, "fetching page");
    progress.emit(SearchProgress::Searching {
        provider: modrinth.provider(),
    });
    progress.emit(SearchProgress::Searching {
        provider: curseforge.provider(),
    });

    let (modrinth, curseforge) = futures::future::join(
        search_or_empty(modrinth, query, timeout),
        search_or_empty(curseforge, query, timeout),
    )
    .await;
    Fetched {
        modrinth,
        curseforge,
    }
}

/// Fetch one deep-search batch starting at provider page `start_page`.
///
/// Whole pages of `batch_page_size` are requested until `batch_target`
/// records per provider are covered. A random delay from `request_delay_ms`
/// separates consecutive pages. Returns the records and the number of pages
/// requested.
pub async fn fetch_batch<M, C>(
    modrinth: &M,
    curseforge: &C,
    query: &Query,
    start_page: usize,
    config: &SearchConfig,
    progress: &ProgressReporter,
) -> (Fetched, usize)
where
    M: CatalogProvider,
    C: CatalogProvider,
{
    let timeout = Duration::from_secs(config.timeout_seconds);
    let page_size = config.batch_page_size;
    let pages = config.batch_pages();
    let mut batch = Fetched::default();

    for offset in 0..pages {
        if offset > 0 {
            let delay = request_delay(config.request_delay_ms);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let provider_query =
            ProviderQuery::for_page(query, start_page.saturating_add(offset), page_size);
        let page = fetch_page(modrinth, curseforge, &provider_query, timeout, progress).await;

        batch.modrinth.extend(page.modrinth);
        batch.curseforge.extend(page.curseforge);
    }

    tracing::debug!(
        start_page,
        pages,
        modrinth = batch.modrinth.len(),
        curseforge = batch.curseforge.len(),
        "batch fetched"
    );
    (batch, pages)
}
