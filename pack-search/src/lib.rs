//! # pack-search
//!
//! Aggregated package search over the Modrinth and CurseForge catalogs.
//!
//! A query is sent to both catalogs concurrently. Records that denote the
//! same package are merged into one [`AggregatedRecord`] carrying both
//! provider links and the summed download count, then ranked by fuzzy text
//! relevance blended with popularity.
//!
//! ## Design
//!
//! - Providers sit behind the [`CatalogProvider`] trait; tests plug in
//!   in-memory implementations
//! - Provider failures and timeouts degrade to empty results, never errors
//! - Optional pair search looks up each record's missing provider link
//! - Deep searches are cached per query signature and extended one batch at
//!   a time as callers page past the end
//! - Same-signature requests share one in-flight fetch
//! - Progress is reported through an optional channel of [`SearchProgress`]
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> pack_search::Result<()> {
//! use pack_search::{Query, SearchAggregator, SearchConfig};
//!
//! let aggregator = SearchAggregator::with_default_providers(SearchConfig::default())?;
//! let page = aggregator.request_page(&Query::new("sodium")).await?;
//! for record in &page {
//!     println!("{} by {} ({} downloads)", record.title, record.author, record.downloads);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod progress;
pub mod provider;
pub mod providers;
pub mod types;
pub mod version;

pub use cache::SearchCache;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use orchestrator::search::SearchAggregator;
pub use progress::{ProgressReporter, SearchProgress};
pub use provider::CatalogProvider;
pub use providers::{CurseForgeProvider, ModrinthProvider};
pub use types::{
    AggregatedRecord, ProjectType, Provider, ProviderDownloads, ProviderQuery, ProviderRecord,
    Query, QuerySignature,
};
pub use version::{McVersionComparator, VersionComparator};

/// Fetch one page of aggregated results using the public catalog APIs.
///
/// Builds a fresh [`SearchAggregator`] for the call, so nothing is cached
/// between calls. Long-lived callers should keep an aggregator instead.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, and otherwise the
/// errors of [`SearchAggregator::request_page`].
pub async fn search(query: &Query, config: &SearchConfig) -> Result<Vec<AggregatedRecord>> {
    let aggregator = SearchAggregator::with_default_providers(config.clone())?;
    aggregator.request_page(query).await
}
