//! Error types for the pack-search crate.
//!
//! Provider errors ([`SearchError::Http`], [`SearchError::Parse`],
//! [`SearchError::Timeout`]) are produced by adapters and recovered inside
//! the engine as empty result lists; callers of
//! [`crate::SearchAggregator::request_page`] only ever see
//! [`SearchError::NoResults`], [`SearchError::InvalidQuery`] or
//! [`SearchError::Config`].

/// Errors that can occur during aggregated search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Neither provider produced a record for the requested page.
    #[error("no results")]
    NoResults,

    /// The caller's query cannot be served (e.g. zero page size).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A provider request did not complete within the configured deadline.
    #[error("provider timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a provider failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for pack-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_no_results() {
        assert_eq!(SearchError::NoResults.to_string(), "no results");
    }

    #[test]
    fn display_invalid_query() {
        let err = SearchError::InvalidQuery("page_size must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "invalid query: page_size must be greater than 0"
        );
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("Modrinth exceeded 8s".into());
        assert_eq!(err.to_string(), "provider timed out: Modrinth exceeded 8s");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("missing field `hits`".into());
        assert_eq!(err.to_string(), "parse error: missing field `hits`");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("cache_limit must be > 0".into());
        assert_eq!(err.to_string(), "config error: cache_limit must be > 0");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
