//! CurseForge catalog adapter.
//!
//! Uses the website's public `GET /v1/mods/search` endpoint, which needs no
//! API key. Project types and mod loaders are translated to CurseForge's
//! numeric class and flavor identifiers.

use serde::Deserialize;
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::CatalogProvider;
use crate::types::{ProjectType, Provider, ProviderQuery, ProviderRecord};

/// Largest page CurseForge will serve.
pub const MAX_PAGE_SIZE: usize = 50;

/// CurseForge game id for Minecraft.
const MINECRAFT_GAME_ID: &str = "432";

/// Category slug marking data packs published under the resource-pack class.
const DATA_PACK_CATEGORY: &str = "data-packs";

#[derive(Deserialize)]
struct CurseForgeSearchResponse {
    #[serde(default)]
    data: Option<Vec<CurseForgeProject>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseForgeProject {
    slug: String,
    name: String,
    #[serde(default)]
    summary: String,
    author: CurseForgeAuthor,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    categories: Vec<CurseForgeCategory>,
    #[serde(default)]
    game_version: Option<String>,
    #[serde(rename = "class")]
    class_info: CurseForgeClass,
    #[serde(default)]
    downloads: u64,
}

#[derive(Deserialize)]
struct CurseForgeAuthor {
    username: String,
}

#[derive(Deserialize)]
struct CurseForgeCategory {
    slug: String,
}

#[derive(Deserialize)]
struct CurseForgeClass {
    slug: String,
}

/// CurseForge class id for a project type.
pub fn class_id(project_type: ProjectType) -> u32 {
    match project_type {
        ProjectType::Mod => 6,
        ProjectType::Datapack => 6945,
        ProjectType::Modpack => 4471,
        ProjectType::Plugin => 5,
        ProjectType::Resourcepack => 12,
        ProjectType::Shader => 6552,
    }
}

/// CurseForge game flavor id for a mod loader, if CurseForge knows it.
pub fn loader_id(loader: &str) -> Option<u32> {
    match loader {
        "forge" => Some(1),
        "fabric" => Some(4),
        "quilt" => Some(5),
        "neoforge" => Some(6),
        _ => None,
    }
}

/// CurseForge search adapter.
#[derive(Clone)]
pub struct CurseForgeProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CurseForgeProvider {
    /// Create an adapter using the endpoint and client settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.curseforge_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public project page for a class slug and project slug.
    pub fn project_link(class_slug: &str, slug: &str) -> String {
        format!("https://www.curseforge.com/minecraft/{class_slug}/{slug}")
    }

    fn search_url(&self, query: &ProviderQuery) -> Result<Url, SearchError> {
        let mut page_size = query.page_size;
        if page_size > MAX_PAGE_SIZE {
            tracing::warn!(
                page_size,
                max = MAX_PAGE_SIZE,
                "CurseForge page size too large, clamping"
            );
            page_size = MAX_PAGE_SIZE;
        }

        let mut url = Url::parse(&format!("{}/v1/mods/search", self.base_url))
            .map_err(|e| SearchError::Http(format!("invalid CurseForge base URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("gameId", MINECRAFT_GAME_ID);
            pairs.append_pair("sortField", "1");
            pairs.append_pair("pageSize", &page_size.to_string());
            pairs.append_pair("index", &query.page_index.to_string());
            if let Some(term) = &query.search_term {
                pairs.append_pair("filterText", term);
            }
            if let Some(version) = &query.version {
                pairs.append_pair("gameVersion", version);
            }
            if let Some(project_type) = query.project_type {
                pairs.append_pair("classId", &class_id(project_type).to_string());
            }
            if let Some(loader) = query.mod_loader.as_deref().and_then(loader_id) {
                pairs.append_pair("gameFlavors[0]", &loader.to_string());
            }
        }
        Ok(url)
    }
}

/// Decode a CurseForge search response body into provider records.
///
/// For resource-pack queries, projects tagged as data packs are dropped:
/// CurseForge files some data packs under the resource-pack class.
pub(crate) fn parse_curseforge_json(
    body: &str,
    project_type: Option<ProjectType>,
) -> Result<Vec<ProviderRecord>, SearchError> {
    let response: CurseForgeSearchResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("CurseForge response: {e}")))?;
    let projects = response.data.unwrap_or_default();
    Ok(projects
        .into_iter()
        .filter(|project| {
            project_type != Some(ProjectType::Resourcepack)
                || !project.categories.iter().any(|c| c.slug == DATA_PACK_CATEGORY)
        })
        .map(|project| ProviderRecord {
            provider: Provider::CurseForge,
            url: CurseForgeProvider::project_link(&project.class_info.slug, &project.slug),
            slug: project.slug,
            title: project.name,
            author: project.author.username,
            description: project.summary,
            icon_url: project.avatar_url.unwrap_or_default(),
            downloads: project.downloads,
            follows: None,
            versions: project.game_version.into_iter().collect(),
        })
        .collect())
}

impl CatalogProvider for CurseForgeProvider {
    async fn search(&self, query: &ProviderQuery) -> Result<Vec<ProviderRecord>, SearchError> {
        tracing::trace!(term = ?query.search_term, page = query.page_index, "CurseForge search");

        let url = self.search_url(query)?;
        let body = http::get_body(&self.client, url, "CurseForge").await?;
        parse_curseforge_json(&body, query.project_type)
    }

    fn provider(&self) -> Provider {
        Provider::CurseForge
    }
}
