//! Turning command-line input into an engine [`Query`].

use pack_search::version::sanitize_version;
use pack_search::{ProjectType, Query};

use crate::config::SearchDefaults;
use crate::error::{PackfinderError, Result};

/// Highest 1-based page number a user may ask for.
pub const MAX_PAGE: usize = 100;

/// Search options as entered by a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Free-text search term.
    pub text: String,
    /// Project type filter.
    pub project_type: Option<ProjectType>,
    /// Game version filter, unsanitised.
    pub version: Option<String>,
    /// Mod loader filter.
    pub loader: Option<String>,
    /// 1-based page number.
    pub page: usize,
    /// Records per page; the configured default when `None`.
    pub page_size: Option<usize>,
    /// Force a pair search on.
    pub pair_search: bool,
    /// Force simple (uncached, single page) mode.
    pub simple: bool,
}

/// Map a 1-based user page number onto a 0-based index in `0..MAX_PAGE`.
pub fn page_index(user_page: usize) -> usize {
    user_page.clamp(1, MAX_PAGE) - 1
}

impl SearchRequest {
    /// Build the engine query, applying `defaults` for unset options.
    ///
    /// An unrecognised game version is dropped with a warning rather than
    /// sent to the providers.
    ///
    /// # Errors
    ///
    /// Returns [`PackfinderError::Input`] for a zero page size.
    pub fn into_query(self, defaults: &SearchDefaults) -> Result<Query> {
        let page_size = self.page_size.unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(PackfinderError::Input(
                "page size must be greater than 0".into(),
            ));
        }

        let version = self.version.as_deref().and_then(|raw| {
            let sanitized = sanitize_version(raw);
            if sanitized.is_none() && !raw.trim().is_empty() {
                tracing::warn!(version = raw, "ignoring unrecognised game version");
            }
            sanitized
        });
        let mod_loader = self
            .loader
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty());

        Ok(Query {
            text: self.text.trim().to_string(),
            project_type: self.project_type,
            version,
            mod_loader,
            pair_search: self.pair_search || defaults.pair_search,
            page: page_index(self.page),
            page_size,
            deep: defaults.deep && !self.simple,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> SearchRequest {
        SearchRequest {
            text: text.into(),
            page: 1,
            ..Default::default()
        }
    }

    #[test]
    fn page_numbers_are_clamped() {
        assert_eq!(page_index(0), 0);
        assert_eq!(page_index(1), 0);
        assert_eq!(page_index(7), 6);
        assert_eq!(page_index(100), 99);
        assert_eq!(page_index(5_000), 99);
    }

    #[test]
    fn defaults_fill_unset_options() {
        let query = request("  sodium ")
            .into_query(&SearchDefaults::default())
            .expect("query");
        assert_eq!(query.text, "sodium");
        assert_eq!(query.page, 0);
        assert_eq!(query.page_size, 25);
        assert!(query.deep);
        assert!(!query.pair_search);
    }

    #[test]
    fn flags_override_defaults() {
        let req = SearchRequest {
            page_size: Some(10),
            pair_search: true,
            simple: true,
            page: 3,
            ..request("x")
        };
        let query = req.into_query(&SearchDefaults::default()).expect("query");
        assert_eq!(query.page_size, 10);
        assert_eq!(query.page, 2);
        assert!(query.pair_search);
        assert!(!query.deep);
    }

    #[test]
    fn invalid_version_is_dropped() {
        let req = SearchRequest {
            version: Some("2.0".into()),
            ..request("x")
        };
        assert!(req.into_query(&SearchDefaults::default()).expect("query").version.is_none());

        let req = SearchRequest {
            version: Some(" 1.20.1 ".into()),
            ..request("x")
        };
        assert_eq!(
            req.into_query(&SearchDefaults::default()).expect("query").version.as_deref(),
            Some("1.20.1")
        );
    }

    #[test]
    fn loader_is_normalised() {
        let req = SearchRequest {
            loader: Some(" Fabric ".into()),
            ..request("x")
        };
        let query = req.into_query(&SearchDefaults::default()).expect("query");
        assert_eq!(query.mod_loader.as_deref(), Some("fabric"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let req = SearchRequest {
            page_size: Some(0),
            ..request("x")
        };
        assert!(matches!(
            req.into_query(&SearchDefaults::default()),
            Err(PackfinderError::Input(_))
        ));
    }
}
