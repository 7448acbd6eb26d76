//! A ranked, pageable set of aggregated records.
//!
//! Deep searches keep one [`ResultSet`] per query signature in the cache
//! and grow it batch by batch as callers page past its end.

use crate::types::AggregatedRecord;
use crate::version::VersionComparator;

use super::merge::fold_into;
use super::ranking::{order, rank, score_relevance};

/// Aggregated records for one query signature plus paging bookkeeping.
#[derive(Debug, Clone)]
pub struct ResultSet {
    records: Vec<AggregatedRecord>,
    query_text: String,
    page_size: usize,
    downloads_weight: f64,
    sorted: bool,
    next_page_index: usize,
    exhausted: bool,
}

impl ResultSet {
    /// Wrap freshly merged, unranked records.
    ///
    /// `next_page_index` is the first provider page not yet fetched.
    pub fn new(
        records: Vec<AggregatedRecord>,
        query_text: impl Into<String>,
        page_size: usize,
        downloads_weight: f64,
        next_page_index: usize,
    ) -> Self {
        Self {
            records,
            query_text: query_text.into(),
            page_size,
            downloads_weight,
            sorted: false,
            next_page_index,
            exhausted: false,
        }
    }

    /// Rank the records. A no-op once ranked, so scores are never added twice.
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        rank(&mut self.records, &self.query_text, self.downloads_weight);
        self.sorted = true;
    }

    /// Whether [`sort`](Self::sort) has run.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// All records, in their current order.
    pub fn records(&self) -> &[AggregatedRecord] {
        &self.records
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Page size of the most recent request against this set.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Record a new caller page size. Does not re-rank.
    pub fn set_page_size(&mut self, page_size: usize) {
        if self.page_size != page_size {
            tracing::debug!(
                old = self.page_size,
                new = page_size,
                "page size changed for cached results"
            );
            self.page_size = page_size;
        }
    }

    /// First provider page index the next extension batch should fetch.
    pub fn next_page_index(&self) -> usize {
        self.next_page_index
    }

    /// `true` once an extension batch came back empty.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Mark the upstream catalogs as drained for this query.
    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    /// Returns `true` if `page` at the current page size lies fully inside
    /// the records held.
    pub fn covers(&self, page: usize) -> bool {
        match page_end(page, self.page_size) {
            Some(end) => end <= self.records.len(),
            None => false,
        }
    }

    /// Slice `page` at the current page size. Shorter (or empty) at the tail.
    pub fn page(&self, page: usize) -> &[AggregatedRecord] {
        let len = self.records.len();
        let start = page.saturating_mul(self.page_size).min(len);
        let end = page_end(page, self.page_size).unwrap_or(len).min(len);
        &self.records[start..end]
    }

    /// Grow the set with one more fetched batch.
    ///
    /// The new chunk is scored on its own, folded into the existing records
    /// (matches merge, the rest append) and the whole set re-sorted.
    /// `pages_fetched` advances the next page index. Returns the number of
    /// appended records.
    pub fn extend(
        &mut self,
        mut chunk: Vec<AggregatedRecord>,
        pages_fetched: usize,
        comparator: &dyn VersionComparator,
    ) -> usize {
        self.next_page_index = self.next_page_index.saturating_add(pages_fetched);
        score_relevance(&mut chunk, &self.query_text);
        let appended = fold_into(&mut self.records, chunk, comparator);
        order(
            &mut self.records,
            !self.query_text.trim().is_empty(),
            self.downloads_weight,
        );
        self.sorted = true;
        appended
    }
}

fn page_end(page: usize, page_size: usize) -> Option<usize> {
    page.checked_add(1)?.checked_mul(page_size)
}
