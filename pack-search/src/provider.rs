//! Trait definition for pluggable catalog providers.
//!
//! Each catalog (Modrinth, CurseForge) implements [`CatalogProvider`] to
//! provide a uniform interface for paginated searches. Tests plug in
//! in-memory providers through the same trait.

use crate::error::SearchError;
use crate::types::{Provider, ProviderQuery, ProviderRecord};

/// A pluggable catalog search backend.
///
/// Implementors handle their own:
///
/// - URL construction with query encoding and filter translation
/// - HTTP request with appropriate headers
/// - JSON decoding into [`ProviderRecord`] values
///
/// Returned records are already paginated and filtered by the catalog's own
/// query semantics. Errors are never fatal to an aggregated search: the
/// engine logs them and continues with an empty list.
///
/// All implementations must be `Send + Sync` so both catalogs can be
/// queried concurrently.
pub trait CatalogProvider: Send + Sync {
    /// Run one paginated search and return normalised records.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails or the response
    /// cannot be decoded.
    fn search(
        &self,
        query: &ProviderQuery,
    ) -> impl std::future::Future<Output = Result<Vec<ProviderRecord>, SearchError>> + Send;

    /// Returns which [`Provider`] this implementation represents.
    fn provider(&self) -> Provider;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider {
        provider: Provider,
        records: Vec<ProviderRecord>,
    }

    impl CatalogProvider for MockProvider {
        async fn search(&self, query: &ProviderQuery) -> Result<Vec<ProviderRecord>, SearchError> {
            if self.records.is_empty() {
                return Err(SearchError::Http("mock provider down".into()));
            }
            Ok(self
                .records
                .iter()
                .skip(query.offset().unwrap_or(usize::MAX))
                .take(query.page_size)
                .cloned()
                .collect())
        }

        fn provider(&self) -> Provider {
            self.provider
        }
    }

    fn record(slug: &str) -> ProviderRecord {
        ProviderRecord {
            provider: Provider::Modrinth,
            slug: slug.into(),
            title: slug.into(),
            author: "author".into(),
            description: String::new(),
            icon_url: String::new(),
            url: format!("https://modrinth.com/project/{slug}"),
            downloads: 1,
            follows: None,
            versions: vec![],
        }
    }

    #[test]
    fn mock_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockProvider>();
    }

    #[tokio::test]
    async fn mock_provider_pages_results() {
        let provider = MockProvider {
            provider: Provider::Modrinth,
            records: (0..7).map(|i| record(&format!("p{i}"))).collect(),
        };
        let query = ProviderQuery {
            search_term: None,
            project_type: None,
            version: None,
            mod_loader: None,
            page_index: 1,
            page_size: 5,
        };
        let page = provider.search(&query).await.expect("should succeed");
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].slug, "p5");
    }

    #[tokio::test]
    async fn mock_provider_propagates_errors() {
        let provider = MockProvider {
            provider: Provider::CurseForge,
            records: vec![],
        };
        let query = ProviderQuery::lookup("anything", None, 5);
        let result = provider.search(&query).await;
        assert!(result.unwrap_err().to_string().contains("mock provider down"));
        assert_eq!(provider.provider(), Provider::CurseForge);
    }
}
