//! Core types: queries, provider records and aggregated results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of creative-content package a query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Gameplay mods.
    Mod,
    /// Vanilla data packs.
    Datapack,
    /// Resource (texture) packs.
    Resourcepack,
    /// Bundled modpacks.
    Modpack,
    /// Server plugins.
    Plugin,
    /// Shader packs.
    Shader,
}

impl ProjectType {
    /// Returns the lowercase identifier used by both catalogs' query syntax.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Mod => "mod",
            Self::Datapack => "datapack",
            Self::Resourcepack => "resourcepack",
            Self::Modpack => "modpack",
            Self::Plugin => "plugin",
            Self::Shader => "shader",
        }
    }

    /// Returns all project type variants.
    pub fn all() -> &'static [ProjectType] {
        &[
            Self::Mod,
            Self::Datapack,
            Self::Resourcepack,
            Self::Modpack,
            Self::Plugin,
            Self::Shader,
        ]
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.id() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown project type: {s}"))
    }
}

/// The two catalogs results are aggregated from.
///
/// Modrinth records form the base set during merging; CurseForge records
/// are matched against it or appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Modrinth (`api.modrinth.com`).
    Modrinth,
    /// CurseForge (`www.curseforge.com`).
    CurseForge,
}

impl Provider {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Modrinth => "Modrinth",
            Self::CurseForge => "CurseForge",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A caller's search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Free-text search term. May be empty.
    pub text: String,
    /// Restrict results to one kind of package.
    pub project_type: Option<ProjectType>,
    /// Game version filter, already validated by the caller.
    pub version: Option<String>,
    /// Mod loader filter (e.g. `"fabric"`).
    pub mod_loader: Option<String>,
    /// Look up missing cross-provider links for every result.
    pub pair_search: bool,
    /// 0-based page index.
    pub page: usize,
    /// Number of records per page. Must be greater than 0.
    pub page_size: usize,
    /// Use the cached, multi-page deep search instead of a single page fetch.
    pub deep: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: String::new(),
            project_type: None,
            version: None,
            mod_loader: None,
            pair_search: false,
            page: 0,
            page_size: 25,
            deep: true,
        }
    }
}

impl Query {
    /// Convenience constructor for a free-text query with defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// The cache key for this query. Paging and mode flags are excluded.
    pub fn signature(&self) -> QuerySignature {
        QuerySignature {
            text: self.text.clone(),
            mod_loader: self.mod_loader.clone(),
            version: self.version.clone(),
            project_type: self.project_type,
        }
    }
}

/// Subset of [`Query`] identifying one cached deep-search result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySignature {
    text: String,
    mod_loader: Option<String>,
    version: Option<String>,
    project_type: Option<ProjectType>,
}

/// A single provider request, as issued to a [`crate::CatalogProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Search term; `None` browses the catalog.
    pub search_term: Option<String>,
    /// Project type filter.
    pub project_type: Option<ProjectType>,
    /// Game version filter.
    pub version: Option<String>,
    /// Mod loader filter.
    pub mod_loader: Option<String>,
    /// 0-based page index in units of `page_size`.
    pub page_index: usize,
    /// Records per provider page.
    pub page_size: usize,
}

impl ProviderQuery {
    /// Build the provider request for one page of a caller's query.
    pub fn for_page(query: &Query, page_index: usize, page_size: usize) -> Self {
        Self {
            search_term: Some(query.text.clone()).filter(|t| !t.is_empty()),
            project_type: query.project_type,
            version: query.version.clone(),
            mod_loader: query.mod_loader.clone(),
            page_index,
            page_size,
        }
    }

    /// Build a pair-search lookup: title as the term, project type only.
    pub fn lookup(title: &str, project_type: Option<ProjectType>, page_size: usize) -> Self {
        Self {
            search_term: Some(title.to_string()),
            project_type,
            version: None,
            mod_loader: None,
            page_index: 0,
            page_size,
        }
    }

    /// Record offset of the first entry on this page, `None` on overflow.
    pub fn offset(&self) -> Option<usize> {
        self.page_index.checked_mul(self.page_size)
    }
}

/// A search hit as normalised by a provider adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Which catalog returned this record.
    pub provider: Provider,
    /// URL-safe project identifier.
    pub slug: String,
    /// Display name.
    pub title: String,
    /// Author or owning team username.
    pub author: String,
    /// Short summary.
    pub description: String,
    /// Project icon.
    pub icon_url: String,
    /// Project page on the provider's website.
    pub url: String,
    /// Lifetime download count.
    pub downloads: u64,
    /// Follower count, if the provider reports one.
    pub follows: Option<u64>,
    /// Supported game versions, oldest first.
    pub versions: Vec<String>,
}

impl ProviderRecord {
    /// The most recent supported game version, if any.
    pub fn latest_version(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }
}

/// A package known to one or both providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    /// URL-safe project identifier.
    pub slug: String,
    /// Display name.
    pub title: String,
    /// Author username.
    pub author: String,
    /// Short summary.
    pub description: String,
    /// Project icon.
    pub icon_url: String,
    /// Downloads summed across every matched provider.
    pub downloads: u64,
    /// Each provider's share of `downloads`.
    #[serde(default)]
    pub provider_downloads: ProviderDownloads,
    /// Modrinth follower count, if known.
    pub follows: Option<u64>,
    /// Resolved game version (the more conservative one when providers disagree).
    pub version: Option<String>,
    /// Modrinth project page.
    pub modrinth: Option<String>,
    /// CurseForge project page.
    pub curseforge: Option<String>,
    /// Relevance and popularity weight used for ranking.
    pub weight: f64,
}

/// Download counts contributed by each provider to one aggregated record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDownloads {
    /// Modrinth downloads.
    pub modrinth: u64,
    /// CurseForge downloads.
    pub curseforge: u64,
}

impl ProviderDownloads {
    /// Downloads reported by `provider`.
    pub fn get(&self, provider: Provider) -> u64 {
        match provider {
            Provider::Modrinth => self.modrinth,
            Provider::CurseForge => self.curseforge,
        }
    }

    pub(crate) fn add(&mut self, provider: Provider, downloads: u64) {
        match provider {
            Provider::Modrinth => self.modrinth += downloads,
            Provider::CurseForge => self.curseforge += downloads,
        }
    }
}

impl AggregatedRecord {
    /// Returns the link for `provider`, if this record has one.
    pub fn link(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Modrinth => self.modrinth.as_deref(),
            Provider::CurseForge => self.curseforge.as_deref(),
        }
    }

    /// Returns `true` if the record is linked to `provider`.
    pub fn has_link(&self, provider: Provider) -> bool {
        self.link(provider).is_some()
    }

    pub(crate) fn set_link(&mut self, provider: Provider, url: String) {
        match provider {
            Provider::Modrinth => self.modrinth = Some(url),
            Provider::CurseForge => self.curseforge = Some(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_type_ids_round_trip_through_from_str() {
        for ty in ProjectType::all() {
            let parsed: ProjectType = ty.id().parse().expect("parse");
            assert_eq!(parsed, *ty);
        }
        assert_eq!("  Shader ".parse::<ProjectType>(), Ok(ProjectType::Shader));
        assert!("texturepack".parse::<ProjectType>().is_err());
    }

    #[test]
    fn project_type_serialises_lowercase() {
        let json = serde_json::to_string(&ProjectType::Resourcepack).expect("serialize");
        assert_eq!(json, "\"resourcepack\"");
    }

    #[test]
    fn provider_display() {
        assert_eq!(Provider::Modrinth.to_string(), "Modrinth");
        assert_eq!(Provider::CurseForge.to_string(), "CurseForge");
    }

    #[test]
    fn signature_ignores_paging_and_mode() {
        let a = Query {
            text: "sodium".into(),
            page: 0,
            page_size: 10,
            deep: true,
            ..Default::default()
        };
        let b = Query {
            page: 4,
            page_size: 50,
            pair_search: true,
            ..a.clone()
        };
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn signature_differs_on_filters() {
        let a = Query::new("sodium");
        let b = Query {
            mod_loader: Some("fabric".into()),
            ..a.clone()
        };
        let c = Query {
            version: Some("1.20.1".into()),
            ..a.clone()
        };
        let d = Query {
            project_type: Some(ProjectType::Mod),
            ..a.clone()
        };
        assert_ne!(a.signature(), b.signature());
        assert_ne!(a.signature(), c.signature());
        assert_ne!(a.signature(), d.signature());
    }

    #[test]
    fn provider_query_drops_empty_search_term() {
        let query = Query::new("");
        let pq = ProviderQuery::for_page(&query, 2, 50);
        assert!(pq.search_term.is_none());
        assert_eq!(pq.page_index, 2);
        assert_eq!(pq.page_size, 50);
    }

    #[test]
    fn lookup_query_uses_title_and_type_only() {
        let pq = ProviderQuery::lookup("Iris Shaders", Some(ProjectType::Shader), 5);
        assert_eq!(pq.search_term.as_deref(), Some("Iris Shaders"));
        assert_eq!(pq.project_type, Some(ProjectType::Shader));
        assert!(pq.version.is_none());
        assert!(pq.mod_loader.is_none());
        assert_eq!(pq.page_index, 0);
        assert_eq!(pq.page_size, 5);
    }

    #[test]
    fn latest_version_is_last_entry() {
        let record = ProviderRecord {
            provider: Provider::Modrinth,
            slug: "lithium".into(),
            title: "Lithium".into(),
            author: "jellysquid3".into(),
            description: String::new(),
            icon_url: String::new(),
            url: "https://modrinth.com/project/lithium".into(),
            downloads: 10,
            follows: None,
            versions: vec!["1.19.4".into(), "1.20.1".into()],
        };
        assert_eq!(record.latest_version(), Some("1.20.1"));
    }

    #[test]
    fn aggregated_record_links() {
        let mut record = AggregatedRecord {
            slug: "jei".into(),
            title: "JEI".into(),
            author: "mezz".into(),
            description: String::new(),
            icon_url: String::new(),
            downloads: 0,
            provider_downloads: ProviderDownloads::default(),
            follows: None,
            version: None,
            modrinth: None,
            curseforge: None,
            weight: 0.0,
        };
        assert!(!record.has_link(Provider::CurseForge));
        record.set_link(Provider::CurseForge, "https://cf/jei".into());
        assert_eq!(record.link(Provider::CurseForge), Some("https://cf/jei"));
        assert!(!record.has_link(Provider::Modrinth));
    }
}
