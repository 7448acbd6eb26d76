//! Game version validation and ordering.
//!
//! The engine never parses version strings itself; it asks a
//! [`VersionComparator`]. [`McVersionComparator`] understands Minecraft
//! release versions (`1.20`, `1.20.1`) and, optionally, weekly snapshots
//! (`23w13a`).

use std::cmp::Ordering;

/// Validates and orders game version strings.
pub trait VersionComparator: Send + Sync {
    /// Returns `true` if `version` is well-formed.
    fn is_valid(&self, version: &str) -> bool;

    /// Orders two versions. Returns `None` if either input is invalid.
    fn compare(&self, a: &str, b: &str) -> Option<Ordering>;
}

/// Minecraft version comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct McVersionComparator {
    /// Accept snapshot identifiers such as `23w13a`.
    pub include_snapshots: bool,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum McVersion {
    // Declared first so every snapshot sorts before every release.
    Snapshot { year: u32, week: u32, letter: char },
    Release([u32; 3]),
}

impl McVersionComparator {
    /// Comparator that also accepts snapshot identifiers.
    pub fn with_snapshots() -> Self {
        Self {
            include_snapshots: true,
        }
    }

    fn parse(&self, version: &str) -> Option<McVersion> {
        let version = version.trim();
        let sections: Vec<&str> = version.split('.').collect();

        match sections.len() {
            1 if self.include_snapshots => parse_snapshot(version),
            2 | 3 => {
                let mut parts = [0u32; 3];
                for (slot, section) in parts.iter_mut().zip(&sections) {
                    if !is_digits(section) {
                        return None;
                    }
                    *slot = section.parse().ok()?;
                }
                Some(McVersion::Release(parts))
            }
            _ => None,
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_snapshot(version: &str) -> Option<McVersion> {
    let (year, rest) = version.split_once('w')?;
    let letter = rest.chars().last()?;
    let week = &rest[..rest.len() - letter.len_utf8()];
    if !is_digits(year) || !is_digits(week) || !letter.is_ascii_lowercase() {
        return None;
    }
    Some(McVersion::Snapshot {
        year: year.parse().ok()?,
        week: week.parse().ok()?,
        letter,
    })
}

impl VersionComparator for McVersionComparator {
    fn is_valid(&self, version: &str) -> bool {
        self.parse(version).is_some()
    }

    fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        Some(self.parse(a)?.cmp(&self.parse(b)?))
    }
}

/// Sanitise a user-supplied version filter.
///
/// Accepts only release versions of the form `1.x` or `1.x.y`; anything
/// else yields `None` so the filter is dropped rather than sent to providers.
pub fn sanitize_version(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let comparator = McVersionComparator::default();
    if !comparator.is_valid(trimmed) {
        return None;
    }
    let major = trimmed.split('.').next()?;
    (major == "1").then(|| trimmed.to_string())
}

/// Pick the version a merged record should present.
///
/// When both sides are valid the lower (more conservative) one wins. A
/// missing or malformed current value is replaced by a valid candidate.
pub fn reconcile(
    comparator: &dyn VersionComparator,
    current: Option<String>,
    candidate: Option<&str>,
) -> Option<String> {
    let Some(candidate) = candidate.filter(|c| comparator.is_valid(c)) else {
        return current;
    };
    match current {
        Some(cur) if comparator.is_valid(&cur) => match comparator.compare(&cur, candidate) {
            Some(Ordering::Greater) => Some(candidate.to_string()),
            _ => Some(cur),
        },
        _ => Some(candidate.to_string()),
    }
}
