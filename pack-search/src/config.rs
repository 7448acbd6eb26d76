//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls provider endpoints, timeouts, deep-search batch
//! sizes, pair-search fan-out, the result-set cache bounds and the ranking
//! exponent. The defaults mirror what both public catalog APIs tolerate.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration for the search aggregator.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour. Missing fields fall back to the
/// defaults when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-provider request deadline in seconds. Expiry counts as a
    /// provider failure (empty result).
    pub timeout_seconds: u64,
    /// Records requested per provider page during a deep-search batch.
    pub batch_page_size: usize,
    /// Records per provider gathered by one deep-search batch.
    pub batch_target: usize,
    /// Page size of each pair-search lookup.
    pub pair_search_page_size: usize,
    /// How many pair-search lookups may be in flight at once.
    pub pair_search_concurrency: usize,
    /// Maximum number of cached deep-search result sets.
    pub cache_limit: usize,
    /// How many of the oldest result sets are dropped once the limit is exceeded.
    pub cache_trim: usize,
    /// Exponent applied to download ratios when ranking.
    pub downloads_weight: f64,
    /// Random delay range in milliseconds `(min, max)` between consecutive
    /// pages of one batch.
    pub request_delay_ms: (u64, u64),
    /// Custom User-Agent string. If `None`, a crate-identifying default is used.
    pub user_agent: Option<String>,
    /// Base URL of the Modrinth API.
    pub modrinth_base_url: String,
    /// Base URL of the CurseForge API.
    pub curseforge_base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            batch_page_size: 50,
            batch_target: 100,
            pair_search_page_size: 5,
            pair_search_concurrency: 1,
            cache_limit: 20,
            cache_trim: 10,
            downloads_weight: 0.0625,
            request_delay_ms: (0, 0),
            user_agent: None,
            modrinth_base_url: "https://api.modrinth.com".into(),
            curseforge_base_url: "https://www.curseforge.com/api".into(),
        }
    }
}

impl SearchConfig {
    /// Number of provider pages fetched by one deep-search batch.
    pub fn batch_pages(&self) -> usize {
        self.batch_target / self.batch_page_size.max(1)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds`, `batch_page_size`, `batch_target`,
    ///   `pair_search_page_size`, `pair_search_concurrency` and `cache_limit`
    ///   must be greater than 0
    /// - `batch_target` must be a multiple of `batch_page_size`
    /// - `cache_trim` must be in `1..=cache_limit`
    /// - `downloads_weight` must be a positive finite number
    /// - `request_delay_ms.0` must be <= `request_delay_ms.1`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.batch_page_size == 0 {
            return Err(SearchError::Config(
                "batch_page_size must be greater than 0".into(),
            ));
        }
        if self.batch_target == 0 {
            return Err(SearchError::Config(
                "batch_target must be greater than 0".into(),
            ));
        }
        if self.batch_target % self.batch_page_size != 0 {
            return Err(SearchError::Config(format!(
                "batch_target ({}) must be a multiple of batch_page_size ({})",
                self.batch_target, self.batch_page_size
            )));
        }
        if self.pair_search_page_size == 0 {
            return Err(SearchError::Config(
                "pair_search_page_size must be greater than 0".into(),
            ));
        }
        if self.pair_search_concurrency == 0 {
            return Err(SearchError::Config(
                "pair_search_concurrency must be greater than 0".into(),
            ));
        }
        if self.cache_limit == 0 {
            return Err(SearchError::Config(
                "cache_limit must be greater than 0".into(),
            ));
        }
        if self.cache_trim == 0 || self.cache_trim > self.cache_limit {
            return Err(SearchError::Config(
                "cache_trim must be between 1 and cache_limit".into(),
            ));
        }
        if !self.downloads_weight.is_finite() || self.downloads_weight <= 0.0 {
            return Err(SearchError::Config(
                "downloads_weight must be a positive number".into(),
            ));
        }
        if self.request_delay_ms.0 > self.request_delay_ms.1 {
            return Err(SearchError::Config(
                "request_delay_ms min must be <= max".into(),
            ));
        }
        Ok(())
    }
}
