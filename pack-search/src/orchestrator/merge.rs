//! Cross-provider record merging.
//!
//! Converts provider records into [`AggregatedRecord`]s and folds records
//! that denote the same package into one. Two records are the same package
//! when their slugs are equal, or when both title and author are equal.
//! Comparison is exact and case-sensitive.

use crate::types::{AggregatedRecord, Provider, ProviderDownloads, ProviderRecord};
use crate::version::{reconcile, VersionComparator};

/// Returns `true` if the two (slug, title, author) triples denote the same package.
fn same_identity(a: (&str, &str, &str), b: (&str, &str, &str)) -> bool {
    a.0 == b.0 || (a.1 == b.1 && a.2 == b.2)
}

fn record_identity(record: &ProviderRecord) -> (&str, &str, &str) {
    (&record.slug, &record.title, &record.author)
}

fn aggregate_identity(record: &AggregatedRecord) -> (&str, &str, &str) {
    (&record.slug, &record.title, &record.author)
}

/// Returns `true` if `candidate` is the same package as `record`.
pub fn is_match(record: &AggregatedRecord, candidate: &ProviderRecord) -> bool {
    same_identity(aggregate_identity(record), record_identity(candidate))
}

/// Popularity seed for a record's ranking weight.
///
/// Follower-to-download ratio, scaled harder for established projects.
/// Zero when either count is missing or zero.
pub fn popularity(downloads: u64, follows: Option<u64>) -> f64 {
    match follows {
        Some(follows) if follows > 0 && downloads > 0 => {
            let ratio = follows as f64 / downloads as f64;
            if downloads > 1000 {
                ratio * 25.0
            } else {
                ratio * 5.0
            }
        }
        _ => 0.0,
    }
}

/// Build a single-provider aggregated record.
pub fn from_provider(record: ProviderRecord) -> AggregatedRecord {
    let version = record.latest_version().map(str::to_string);
    let weight = match record.provider {
        Provider::Modrinth => popularity(record.downloads, record.follows),
        Provider::CurseForge => 0.0,
    };
    let mut provider_downloads = ProviderDownloads::default();
    provider_downloads.add(record.provider, record.downloads);
    let mut aggregated = AggregatedRecord {
        slug: record.slug,
        title: record.title,
        author: record.author,
        description: record.description,
        icon_url: record.icon_url,
        downloads: record.downloads,
        provider_downloads,
        follows: record.follows,
        version,
        modrinth: None,
        curseforge: None,
        weight,
    };
    aggregated.set_link(record.provider, record.url);
    aggregated
}

/// Attach `other`'s provider link to `record` and fold in its counts.
///
/// Downloads are summed and the version reconciled. A Modrinth record also
/// contributes its follower count, which re-seeds the popularity weight.
pub fn absorb(
    record: &mut AggregatedRecord,
    other: &ProviderRecord,
    comparator: &dyn VersionComparator,
) {
    record.set_link(other.provider, other.url.clone());
    record.downloads += other.downloads;
    record.provider_downloads.add(other.provider, other.downloads);
    record.version = reconcile(comparator, record.version.take(), other.latest_version());

    if other.provider == Provider::Modrinth && other.follows.is_some() {
        record.follows = other.follows;
        record.weight = popularity(other.downloads, other.follows);
    }
}

/// Merge one page (or batch) of Modrinth and CurseForge records.
///
/// Modrinth records form the base set, in order. Each picks up the first
/// matching CurseForge record. CurseForge records matching nothing already
/// in the output are appended after the base set.
pub fn merge(
    modrinth: Vec<ProviderRecord>,
    curseforge: Vec<ProviderRecord>,
    comparator: &dyn VersionComparator,
) -> Vec<AggregatedRecord> {
    let mut results: Vec<AggregatedRecord> = Vec::with_capacity(modrinth.len() + curseforge.len());

    for mr in modrinth {
        let mut record = from_provider(mr);
        if let Some(cf) = curseforge.iter().find(|cf| is_match(&record, cf)) {
            absorb(&mut record, cf, comparator);
        }
        results.push(record);
    }

    if curseforge.is_empty() {
        tracing::warn!("could not retrieve any results for CurseForge");
        return results;
    }

    for cf in curseforge {
        if !results.iter().any(|r| is_match(r, &cf)) {
            results.push(from_provider(cf));
        }
    }

    results
}

/// Fold newly fetched records into an existing set.
///
/// A record matching an existing one contributes every provider link the
/// existing record lacks, together with that provider's downloads, and the
/// versions are reconciled. Gaining the Modrinth link also brings its
/// follower count and popularity: a record without Modrinth carries none.
/// Everything else is appended. Returns the number of appended records.
pub fn fold_into(
    existing: &mut Vec<AggregatedRecord>,
    incoming: Vec<AggregatedRecord>,
    comparator: &dyn VersionComparator,
) -> usize {
    let mut appended = 0;
    for record in incoming {
        let identity = aggregate_identity(&record);
        let Some(target) = existing
            .iter_mut()
            .find(|e| same_identity(aggregate_identity(e), identity))
        else {
            existing.push(record);
            appended += 1;
            continue;
        };

        let mut gained = false;
        for provider in [Provider::Modrinth, Provider::CurseForge] {
            let Some(url) = record.link(provider) else {
                continue;
            };
            if target.has_link(provider) {
                continue;
            }
            let share = record.provider_downloads.get(provider);
            target.set_link(provider, url.to_string());
            target.downloads += share;
            target.provider_downloads.add(provider, share);
            if provider == Provider::Modrinth && record.follows.is_some() {
                target.follows = record.follows;
                target.weight += popularity(share, record.follows);
            }
            gained = true;
        }
        if gained {
            let current = target.version.take();
            target.version = reconcile(comparator, current, record.version.as_deref());
        }
    }
    appended
}
