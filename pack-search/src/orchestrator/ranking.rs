//! Relevance and popularity ranking.
//!
//! Ranking happens in two steps:
//!
//! 1. [`score_relevance`] adds a fuzzy-text bonus to each record's weight
//!    (which already holds its popularity seed from merging):
//!
//!    ```text
//!    weight += tan(1 - similarity)        0 = perfect similarity
//!    ```
//!
//! 2. [`order`] sorts with a pairwise comparator mixing weight and the
//!    download ratio of the two records:
//!
//!    ```text
//!    cmp(a, b) = weight(b) + (dl(b)/dl(a))^e - weight(a) - (dl(a)/dl(b))^e
//!    e = downloads_weight        if weight(b) > CONFIDENT_MATCH
//!        downloads_weight / 4    otherwise
//!    ```
//!
//! Step 1 is additive, so a record must only ever be scored once.

use std::cmp::Ordering;

use crate::types::AggregatedRecord;

use super::fuzzy::{record_score, tokenize, Field};

/// Weight above which a record counts as a confident text match.
pub const CONFIDENT_MATCH: f64 = 1.5;

/// Key weights for the fuzzy match: title, description, author, slug.
const TITLE_WEIGHT: f64 = 2.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;
const AUTHOR_WEIGHT: f64 = 1.0;
const SLUG_WEIGHT: f64 = 1.0;

/// Bonus for a fuzzy similarity score, or `None` when it counts as unmatched.
pub fn relevance_bonus(similarity: f64) -> Option<f64> {
    if !similarity.is_finite() || similarity >= 1.0 {
        return None;
    }
    Some((1.0 - similarity.max(0.0)).tan())
}

/// Add the fuzzy-text bonus for `query_text` to every matching record.
///
/// Does nothing for an empty query. Returns the number of matched records.
pub fn score_relevance(records: &mut [AggregatedRecord], query_text: &str) -> usize {
    let tokens = tokenize(query_text);
    if tokens.is_empty() {
        return 0;
    }

    let mut matched = 0;
    for record in records.iter_mut() {
        let fields = [
            Field::new(&record.title, TITLE_WEIGHT),
            Field::new(&record.description, DESCRIPTION_WEIGHT),
            Field::new(&record.author, AUTHOR_WEIGHT),
            Field::new(&record.slug, SLUG_WEIGHT),
        ];
        if let Some(bonus) = record_score(&tokens, &fields).and_then(relevance_bonus) {
            record.weight += bonus;
            matched += 1;
        }
    }
    matched
}

/// `(x / y)^exponent` with zero download counts treated as one.
fn download_ratio(x: u64, y: u64, exponent: f64) -> f64 {
    (x.max(1) as f64 / y.max(1) as f64).powf(exponent)
}

/// Pairwise ranking comparator. Negative means `a` ranks first.
pub fn compare(a: &AggregatedRecord, b: &AggregatedRecord, downloads_weight: f64) -> f64 {
    let exponent = if b.weight > CONFIDENT_MATCH {
        downloads_weight
    } else {
        downloads_weight / 4.0
    };
    (b.weight + download_ratio(b.downloads, a.downloads, exponent))
        - (a.weight + download_ratio(a.downloads, b.downloads, exponent))
}

/// Sort records into ranking order.
///
/// With query text, ranks by [`compare`]; without, by downloads descending.
pub fn order(records: &mut Vec<AggregatedRecord>, has_query: bool, downloads_weight: f64) {
    if has_query {
        merge_sort_by(records, |a, b| {
            let delta = compare(a, b, downloads_weight);
            if delta > 0.0 {
                Ordering::Greater
            } else if delta < 0.0 {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        });
    } else {
        records.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    }
}

/// Score and sort in one pass.
pub fn rank(records: &mut Vec<AggregatedRecord>, query_text: &str, downloads_weight: f64) {
    let matched = score_relevance(records, query_text);
    tracing::debug!(records = records.len(), matched, "ranking records");
    order(records, !query_text.trim().is_empty(), downloads_weight);
}

/// Stable top-down merge sort.
///
/// [`compare`] is not a strict total order (its exponent depends on which
/// side is `b`), which the standard library sort may reject with a panic.
/// Merge sort simply consumes whatever the comparator answers.
fn merge_sort_by<T, F>(items: &mut Vec<T>, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let taken = std::mem::take(items);
    *items = sort_run(taken, &mut cmp);
}

fn sort_run<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = sort_run(items, cmp);
    let right = sort_run(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderDownloads;

    fn make_record(slug: &str, title: &str, downloads: u64, weight: f64) -> AggregatedRecord {
        AggregatedRecord {
            slug: slug.into(),
            title: title.into(),
            author: "someone".into(),
            description: String::new(),
            icon_url: String::new(),
            downloads,
            provider_downloads: ProviderDownloads {
                modrinth: downloads,
                curseforge: 0,
            },
            follows: None,
            version: None,
            modrinth: Some(format!("https://modrinth.com/project/{slug}")),
            curseforge: None,
            weight,
        }
    }

    #[test]
    fn bonus_is_tangent_of_complement() {
        let perfect = relevance_bonus(0.0).expect("bonus");
        assert!((perfect - 1.0f64.tan()).abs() < 1e-12);
        let weak = relevance_bonus(0.5).expect("bonus");
        assert!((weak - 0.5f64.tan()).abs() < 1e-12);
        assert!(perfect > weak);
    }

    #[test]
    fn similarity_of_one_or_more_is_unmatched() {
        assert!(relevance_bonus(1.0).is_none());
        assert!(relevance_bonus(1.5).is_none());
        assert!(relevance_bonus(f64::NAN).is_none());
    }

    #[test]
    fn perfect_match_clears_confident_threshold() {
        assert!(relevance_bonus(0.0).expect("bonus") > CONFIDENT_MATCH);
    }

    #[test]
    fn empty_query_sorts_by_downloads_only() {
        let mut records = vec![
            make_record("a", "A", 10, 0.0),
            make_record("b", "B", 300, 0.0),
            make_record("c", "C", 20, 0.0),
        ];
        rank(&mut records, "", 0.0625);
        let downloads: Vec<u64> = records.iter().map(|r| r.downloads).collect();
        assert_eq!(downloads, vec![300, 20, 10]);
        assert!(records.iter().all(|r| r.weight.abs() < f64::EPSILON));
    }

    #[test]
    fn whitespace_query_counts_as_empty() {
        let mut records = vec![make_record("a", "A", 1, 0.0), make_record("b", "B", 2, 0.0)];
        rank(&mut records, "   ", 0.0625);
        assert_eq!(records[0].slug, "b");
    }

    #[test]
    fn exact_title_match_outranks_popular_unrelated() {
        let mut records = vec![
            make_record("fabric-api", "Fabric API", 50_000_000, 0.0),
            make_record("sodium", "Sodium", 1_000_000, 0.0),
        ];
        rank(&mut records, "sodium", 0.0625);
        assert_eq!(records[0].slug, "sodium");
        assert!(records[0].weight > CONFIDENT_MATCH);
    }

    #[test]
    fn scoring_twice_adds_twice() {
        let mut records = vec![make_record("sodium", "Sodium", 1, 0.0)];
        score_relevance(&mut records, "sodium");
        let once = records[0].weight;
        score_relevance(&mut records, "sodium");
        assert!((records[0].weight - 2.0 * once).abs() < 1e-9);
    }

    #[test]
    fn zero_downloads_do_not_produce_nan() {
        let a = make_record("a", "A", 0, 0.0);
        let b = make_record("b", "B", 100, 0.0);
        let delta = compare(&a, &b, 0.0625);
        assert!(delta.is_finite());
        // b has more downloads, so b ranks first.
        assert!(delta > 0.0);
    }

    #[test]
    fn comparator_prefers_higher_weight_at_equal_downloads() {
        let a = make_record("a", "A", 100, 2.0);
        let b = make_record("b", "B", 100, 0.5);
        assert!(compare(&a, &b, 0.0625) < 0.0);
    }

    #[test]
    fn weak_matches_use_quartered_exponent() {
        let a = make_record("a", "A", 16, 0.0);
        let b = make_record("b", "B", 1, 0.0);
        // b.weight <= 1.5: exponent 0.0625 / 4
        let e = 0.0625 / 4.0;
        let expected = (1.0f64 / 16.0).powf(e) - 16.0f64.powf(e);
        assert!((compare(&a, &b, 0.0625) - expected).abs() < 1e-12);
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut items = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        merge_sort_by(&mut items, |x, y| x.0.cmp(&y.0));
        assert_eq!(items, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }

    #[test]
    fn merge_sort_tolerates_inconsistent_comparator() {
        let mut items: Vec<u32> = (0..200).collect();
        let mut flip = false;
        merge_sort_by(&mut items, |_, _| {
            flip = !flip;
            if flip {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        assert_eq!(items.len(), 200);
    }
}
