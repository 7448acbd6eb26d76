//! Search orchestrator: fan-out, merge, pair search, ranking, paging.
//!
//! Fetches pages from both catalogs concurrently, merges records denoting
//! the same package, optionally looks up missing cross-provider links,
//! ranks by fuzzy relevance and popularity, and serves pages from a cached,
//! incrementally extended result set.

pub mod backfill;
pub mod fetch;
pub mod fuzzy;
pub mod merge;
pub mod ranking;
pub mod results;
pub mod search;
