//! Pair search: find each record's missing provider link.
//!
//! A record known only to one catalog is looked up by title on the other.
//! The first returned record with the same identity is absorbed into it.
//! Lookups run with bounded concurrency but results are applied in record
//! order, so progress only ever increases.

use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::config::SearchConfig;
use crate::progress::{percent, ProgressReporter, SearchProgress};
use crate::provider::CatalogProvider;
use crate::types::{AggregatedRecord, ProjectType, Provider, ProviderQuery};
use crate::version::VersionComparator;

use super::fetch::search_or_empty;
use super::merge::{absorb, is_match};

/// Look up missing cross-provider links for `records` in place.
///
/// Records lacking a CurseForge link are looked up on CurseForge; records
/// lacking a Modrinth link on Modrinth. A miss (or a failed lookup) leaves
/// the record untouched. Returns the number of records that gained a link.
pub async fn backfill<M, C>(
    records: &mut [AggregatedRecord],
    project_type: Option<ProjectType>,
    modrinth: &M,
    curseforge: &C,
    config: &SearchConfig,
    comparator: &dyn VersionComparator,
    progress: &ProgressReporter,
) -> usize
where
    M: CatalogProvider,
    C: CatalogProvider,
{
    let lookups: Vec<(usize, Provider, ProviderQuery)> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let target = if !record.has_link(Provider::CurseForge) {
                Provider::CurseForge
            } else if !record.has_link(Provider::Modrinth) {
                Provider::Modrinth
            } else {
                return None;
            };
            let query =
                ProviderQuery::lookup(&record.title, project_type, config.pair_search_page_size);
            Some((index, target, query))
        })
        .collect();

    let total = lookups.len();
    tracing::info!(lookups = total, "performing a pair search");
    progress.emit(SearchProgress::PairSearch { percent: 0 });
    if total == 0 {
        progress.emit(SearchProgress::PairSearch { percent: 100 });
        return 0;
    }

    let timeout = Duration::from_secs(config.timeout_seconds);
    let mut results = stream::iter(lookups)
        .map(|(index, target, query)| async move {
            let candidates = match target {
                Provider::Modrinth => search_or_empty(modrinth, &query, timeout).await,
                Provider::CurseForge => search_or_empty(curseforge, &query, timeout).await,
            };
            (index, target, candidates)
        })
        .buffered(config.pair_search_concurrency.max(1));

    let mut done = 0;
    let mut linked = 0;
    while let Some((index, target, candidates)) = results.next().await {
        let found = candidates.iter().find(|c| is_match(&records[index], c));
        let record = &mut records[index];
        match found {
            Some(found) => {
                absorb(record, found, comparator);
                linked += 1;
            }
            None => {
                tracing::debug!(
                    provider = %target,
                    slug = %record.slug,
                    title = %record.title,
                    "no pair found"
                );
            }
        }
        done += 1;
        progress.emit(SearchProgress::PairSearch {
            percent: percent(done, total),
        });
    }

    tracing::debug!(linked, lookups = total, "pair search finished");
    linked
}
