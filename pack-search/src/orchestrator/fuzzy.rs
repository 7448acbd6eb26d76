//! Approximate multi-field text matching.
//!
//! Scores are distances in `[0, 1]`: `0.0` is a perfect match, anything
//! above [`MATCH_THRESHOLD`] is no match at all.
//!
//! # Per-token score
//!
//! ```text
//! score = edit_errors / token_len + match_start / LOCATION_DISTANCE
//! ```
//!
//! where `edit_errors` is the smallest edit distance between the token and
//! any substring of the field (case-insensitive), and `match_start` is how
//! far into the field that substring begins.
//!
//! # Record score
//!
//! Every query token must match at least one field. Per field, the scores of
//! the tokens it matched are averaged, then combined across fields as
//!
//! ```text
//! total = Π max(field_score, ε) ^ (key_weight / Σ key_weights × 1 / field_word_count)
//! ```
//!
//! so matches in short, heavily weighted fields (the title) dominate.

/// Largest per-token score still counted as a match.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// How many characters into a field a match may start before the location
/// penalty alone reaches 1.0.
pub const LOCATION_DISTANCE: f64 = 100.0;

/// One searchable field of a record and its key weight.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    /// The field's text.
    pub text: &'a str,
    /// Relative importance of the field.
    pub weight: f64,
}

impl<'a> Field<'a> {
    /// Convenience constructor.
    pub fn new(text: &'a str, weight: f64) -> Self {
        Self { text, weight }
    }
}

/// Split a query into its AND-ed tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Score a single lowercase token against a text.
///
/// Returns `None` when the best alignment is worse than [`MATCH_THRESHOLD`].
pub fn token_score(token: &str, text: &str) -> Option<f64> {
    let pattern: Vec<char> = token.chars().collect();
    if pattern.is_empty() {
        return None;
    }
    let haystack: Vec<char> = text.to_lowercase().chars().collect();
    if haystack.is_empty() {
        return None;
    }
    if haystack == pattern {
        return Some(0.0);
    }

    let m = pattern.len();
    // prev[j]: (errors, start) of the best alignment of pattern[..i] ending
    // just before haystack[j]. Row 0 lets a match start anywhere for free.
    let mut prev: Vec<(usize, usize)> = (0..=haystack.len()).map(|j| (0, j)).collect();
    let mut curr: Vec<(usize, usize)> = vec![(0, 0); haystack.len() + 1];

    for i in 1..=m {
        curr[0] = (i, 0);
        for j in 1..=haystack.len() {
            let cost = usize::from(pattern[i - 1] != haystack[j - 1]);
            let substitute = (prev[j - 1].0 + cost, prev[j - 1].1);
            let delete = (prev[j].0 + 1, prev[j].1);
            let insert = (curr[j - 1].0 + 1, curr[j - 1].1);
            curr[j] = [substitute, delete, insert]
                .into_iter()
                .min_by_key(|(errors, start)| (*errors, *start))
                .unwrap_or(substitute);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev.iter()
        .map(|(errors, start)| *errors as f64 / m as f64 + *start as f64 / LOCATION_DISTANCE)
        .fold(None, |best: Option<f64>, score| match best {
            Some(b) if b <= score => Some(b),
            _ => Some(score),
        })
        .filter(|score| *score <= MATCH_THRESHOLD)
}

/// Score a record's fields against the query tokens.
///
/// Returns `None` if any token matches no field, or if no token is given.
pub fn record_score(tokens: &[String], fields: &[Field<'_>]) -> Option<f64> {
    if tokens.is_empty() {
        return None;
    }
    let total_weight: f64 = fields.iter().map(|f| f.weight).sum();
    if total_weight <= 0.0 {
        return None;
    }

    // scores[field][token]
    let scores: Vec<Vec<Option<f64>>> = fields
        .iter()
        .map(|field| tokens.iter().map(|t| token_score(t, field.text)).collect())
        .collect();

    let every_token_matched =
        (0..tokens.len()).all(|t| scores.iter().any(|per_field| per_field[t].is_some()));
    if !every_token_matched {
        return None;
    }

    let mut total = 1.0;
    for (field, per_token) in fields.iter().zip(&scores) {
        let matched: Vec<f64> = per_token.iter().flatten().copied().collect();
        if matched.is_empty() {
            continue;
        }
        let mean = matched.iter().sum::<f64>() / matched.len() as f64;
        let words = field.text.split_whitespace().count().max(1) as f64;
        let exponent = field.weight / total_weight / words;
        total *= mean.max(f64::EPSILON).powf(exponent);
    }
    Some(total.clamp(0.0, 1.0))
}
