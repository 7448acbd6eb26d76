//! The search aggregator: fetch, merge, pair-search, rank, page.
//!
//! Two modes:
//!
//! - **Simple** (`deep = false`): one page from each provider, merged and
//!   ranked, never cached.
//! - **Deep**: a batch of several provider pages is merged, ranked and cached
//!   per query signature. Later pages are sliced from the cached set; paging
//!   past its end fetches exactly one more batch and folds it in.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::SearchCache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::progress::{ProgressReporter, SearchProgress};
use crate::provider::CatalogProvider;
use crate::providers::{CurseForgeProvider, ModrinthProvider};
use crate::types::{AggregatedRecord, ProviderQuery, Query};
use crate::version::{McVersionComparator, VersionComparator};

use super::backfill::backfill;
use super::fetch::{fetch_batch, fetch_page, Fetched};
use super::merge::merge;
use super::ranking::rank;
use super::results::ResultSet;

/// Aggregates search results from a Modrinth-role and a CurseForge-role
/// [`CatalogProvider`].
///
/// Owns its own [`SearchCache`], so separate aggregators never share results.
pub struct SearchAggregator<M, C> {
    modrinth: M,
    curseforge: C,
    config: SearchConfig,
    comparator: Arc<dyn VersionComparator>,
    cache: SearchCache,
    progress: ProgressReporter,
}

impl SearchAggregator<ModrinthProvider, CurseForgeProvider> {
    /// Aggregator over the public Modrinth and CurseForge APIs.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn with_default_providers(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let modrinth = ModrinthProvider::new(&config)?;
        let curseforge = CurseForgeProvider::new(&config)?;
        Self::new(modrinth, curseforge, config)
    }
}

impl<M, C> SearchAggregator<M, C>
where
    M: CatalogProvider,
    C: CatalogProvider,
{
    /// Create an aggregator over the given providers.
    ///
    /// Uses [`McVersionComparator`] (releases only) and no progress sink.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(modrinth: M, curseforge: C, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            modrinth,
            curseforge,
            cache: SearchCache::new(config.cache_limit, config.cache_trim),
            config,
            comparator: Arc::new(McVersionComparator::default()),
            progress: ProgressReporter::disabled(),
        })
    }

    /// Replace the version comparator used when reconciling versions.
    pub fn with_comparator(mut self, comparator: impl VersionComparator + 'static) -> Self {
        self.comparator = Arc::new(comparator);
        self
    }

    /// Send progress events to `progress`.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The deep-search cache.
    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Return one page of aggregated, ranked results for `query`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidQuery`] if `query.page_size` is 0 (no I/O is done)
    /// - [`SearchError::NoResults`] if nothing was found, or the page is empty
    ///
    /// Provider failures are not errors: they count as empty responses.
    pub async fn request_page(&self, query: &Query) -> Result<Vec<AggregatedRecord>, SearchError> {
        if query.page_size == 0 {
            return Err(SearchError::InvalidQuery(
                "page_size must be greater than 0".into(),
            ));
        }
        tracing::trace!(text = %query.text, page = query.page, deep = query.deep, "page requested");

        let page = if query.deep {
            self.deep_search(query).await?
        } else {
            self.simple_search(query).await
        };
        self.progress.emit(SearchProgress::Done);

        if page.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(page)
    }

    async fn simple_search(&self, query: &Query) -> Vec<AggregatedRecord> {
        tracing::info!("making a simple search request");
        let provider_query = ProviderQuery::for_page(query, query.page, query.page_size);
        let fetched = fetch_page(
            &self.modrinth,
            &self.curseforge,
            &provider_query,
            Duration::from_secs(self.config.timeout_seconds),
            &self.progress,
        )
        .await;

        let mut records = self.collect(fetched, query).await;
        self.progress.emit(SearchProgress::Sorting);
        rank(&mut records, &query.text, self.config.downloads_weight);
        records.truncate(query.page_size);
        records
    }

    async fn deep_search(&self, query: &Query) -> Result<Vec<AggregatedRecord>, SearchError> {
        let signature = query.signature();
        let (slot, mut guard) = self.cache.lock(&signature).await;

        let set = match &mut *guard {
            Some(set) => {
                tracing::info!("getting cached results for deep search");
                set.set_page_size(query.page_size);
                set
            }
            empty => {
                tracing::info!("making a request for a deep search");
                let (fetched, pages) = fetch_batch(
                    &self.modrinth,
                    &self.curseforge,
                    query,
                    0,
                    &self.config,
                    &self.progress,
                )
                .await;
                let records = self.collect(fetched, query).await;
                if records.is_empty() {
                    self.cache.discard(&signature, &slot);
                    return Err(SearchError::NoResults);
                }

                let mut set = ResultSet::new(
                    records,
                    query.text.clone(),
                    query.page_size,
                    self.config.downloads_weight,
                    pages,
                );
                self.progress.emit(SearchProgress::Sorting);
                set.sort();
                empty.insert(set)
            }
        };

        if !set.covers(query.page) && !set.is_exhausted() {
            self.extend(set, query).await;
        }
        Ok(set.page(query.page).to_vec())
    }

    /// Fetch the next batch for a cached set and fold it in.
    async fn extend(&self, set: &mut ResultSet, query: &Query) {
        tracing::info!(
            page = query.page,
            held = set.len(),
            start_page = set.next_page_index(),
            "requesting new items for deep search"
        );
        let (fetched, pages) = fetch_batch(
            &self.modrinth,
            &self.curseforge,
            query,
            set.next_page_index(),
            &self.config,
            &self.progress,
        )
        .await;

        if fetched.is_empty() {
            tracing::info!("providers returned no further records, marking results exhausted");
            set.mark_exhausted();
            return;
        }

        let chunk = self.collect(fetched, query).await;
        self.progress.emit(SearchProgress::Sorting);
        let appended = set.extend(chunk, pages, self.comparator.as_ref());
        tracing::debug!(appended, held = set.len(), "deep search extended");
    }

    /// Merge fetched records and run the pair search when requested.
    async fn collect(&self, fetched: Fetched, query: &Query) -> Vec<AggregatedRecord> {
        let mut records = merge(
            fetched.modrinth,
            fetched.curseforge,
            self.comparator.as_ref(),
        );
        if query.pair_search && !records.is_empty() {
            backfill(
                &mut records,
                query.project_type,
                &self.modrinth,
                &self.curseforge,
                &self.config,
                self.comparator.as_ref(),
                &self.progress,
            )
            .await;
        }
        records
    }
}
