//! Modrinth catalog adapter.
//!
//! Uses the public `GET /v2/search` endpoint. Filters are expressed as
//! facets: a JSON array of OR-groups that are AND-ed together.

use serde::Deserialize;
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::CatalogProvider;
use crate::types::{Provider, ProviderQuery, ProviderRecord};

/// Largest page Modrinth will serve.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Deserialize)]
struct ModrinthSearchResponse {
    hits: Vec<ModrinthHit>,
}

#[derive(Deserialize)]
struct ModrinthHit {
    slug: String,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon_url: Option<String>,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    follows: Option<u64>,
    #[serde(default)]
    versions: Vec<String>,
}

/// Modrinth search adapter.
#[derive(Clone)]
pub struct ModrinthProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ModrinthProvider {
    /// Create an adapter using the endpoint and client settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.modrinth_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public project page for a slug.
    pub fn project_link(slug: &str) -> String {
        format!("https://modrinth.com/project/{slug}")
    }

    fn search_url(&self, query: &ProviderQuery) -> Result<Url, SearchError> {
        let mut page_size = query.page_size;
        if page_size > MAX_PAGE_SIZE {
            tracing::warn!(
                page_size,
                max = MAX_PAGE_SIZE,
                "Modrinth page size too large, clamping"
            );
            page_size = MAX_PAGE_SIZE;
        }

        let offset = query.page_index.checked_mul(page_size).ok_or_else(|| {
            SearchError::InvalidQuery(format!("page {} is out of range", query.page_index))
        })?;

        let mut url = Url::parse(&format!("{}/v2/search", self.base_url))
            .map_err(|e| SearchError::Http(format!("invalid Modrinth base URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &page_size.to_string());
            pairs.append_pair("offset", &offset.to_string());
            if let Some(term) = &query.search_term {
                pairs.append_pair("query", term);
            }
            if let Some(facets) = build_facets(query) {
                pairs.append_pair("facets", &facets);
            }
        }
        Ok(url)
    }
}

/// Serialise the query filters as a Modrinth facet expression.
///
/// Returns `None` when the query has no filters.
pub(crate) fn build_facets(query: &ProviderQuery) -> Option<String> {
    let mut facets: Vec<Vec<String>> = Vec::new();
    if let Some(version) = &query.version {
        facets.push(vec![format!("versions:{version}")]);
    }
    if let Some(project_type) = query.project_type {
        facets.push(vec![format!("project_type:{project_type}")]);
    }
    if let Some(loader) = &query.mod_loader {
        facets.push(vec![format!("categories:{loader}")]);
    }
    if facets.is_empty() {
        return None;
    }
    serde_json::to_string(&facets).ok()
}

/// Decode a Modrinth search response body into provider records.
pub(crate) fn parse_modrinth_json(body: &str) -> Result<Vec<ProviderRecord>, SearchError> {
    let response: ModrinthSearchResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Modrinth response: {e}")))?;
    Ok(response.hits.into_iter().map(into_record).collect())
}

fn into_record(hit: ModrinthHit) -> ProviderRecord {
    ProviderRecord {
        provider: Provider::Modrinth,
        url: ModrinthProvider::project_link(&hit.slug),
        slug: hit.slug,
        title: hit.title,
        author: hit.author,
        description: hit.description,
        icon_url: hit.icon_url.unwrap_or_default(),
        downloads: hit.downloads,
        follows: hit.follows,
        versions: hit.versions,
    }
}

impl CatalogProvider for ModrinthProvider {
    async fn search(&self, query: &ProviderQuery) -> Result<Vec<ProviderRecord>, SearchError> {
        tracing::trace!(term = ?query.search_term, page = query.page_index, "Modrinth search");

        let url = self.search_url(query)?;
        let body = http::get_body(&self.client, url, "Modrinth").await?;
        parse_modrinth_json(&body)
    }

    fn provider(&self) -> Provider {
        Provider::Modrinth
    }
}
