use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Repository used when `GITHUB_REPOSITORY` is not set.
pub const DEFAULT_REPO: &str = "xmannv/xkey";

/// Output file used when `OUTPUT_PATH` is not set.
pub const DEFAULT_OUTPUT_PATH: &str = "appcast.xml";

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Configuration for an appcast run.
#[derive(Debug, Clone)]
pub struct AppcastConfig {
    /// The repository in "owner/repo" format.
    pub repo: String,
    /// Optional GitHub API token, sent as a bearer token.
    pub token: Option<String>,
    /// Where the generated appcast is written.
    pub output_path: PathBuf,
    /// Base URL for GitHub API. Defaults to "https://api.github.com".
    pub(crate) base_url: String,
}

impl AppcastConfig {
    /// Creates a new config with the given repository.
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            token: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Builds a config from `GITHUB_REPOSITORY`, `GITHUB_TOKEN`, `OUTPUT_PATH`
    /// and `GITHUB_API_URL`. Empty variables count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let mut config = Self::new(var("GITHUB_REPOSITORY").unwrap_or_else(|| DEFAULT_REPO.to_string()));
        config.token = var("GITHUB_TOKEN");
        if let Some(path) = var("OUTPUT_PATH") {
            config.output_path = PathBuf::from(path);
        }
        if let Some(url) = var("GITHUB_API_URL") {
            config.base_url = url;
        }
        config
    }

    /// Sets a custom base URL (GitHub Enterprise, tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the GitHub API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the output file path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Splits the repository into owner and name.
    ///
    /// Falls back to the whole string as owner and an empty name when there
    /// is no slash; [`crate::ReleaseFetcher::new`] rejects such values first.
    pub fn owner_and_name(&self) -> (&str, &str) {
        self.repo.split_once('/').unwrap_or((self.repo.as_str(), ""))
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// The file name (e.g., "XKey.dmg").
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
    /// Size in bytes.
    pub size: u64,
}

/// Represents a GitHub release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// The release tag name (e.g., "v1.0.0").
    pub tag_name: String,
    /// The release name/title.
    pub name: Option<String>,
    /// The release notes in markdown.
    pub body: Option<String>,
    /// Whether this is a prerelease.
    pub prerelease: bool,
    /// Whether this is a draft release.
    pub draft: bool,
    /// The URL to the release page.
    pub html_url: String,
    /// Raw ISO-8601 publish timestamp.
    pub published_at: Option<String>,
    /// Raw ISO-8601 creation timestamp.
    pub created_at: Option<String>,
    /// Files attached to the release.
    pub assets: Vec<Asset>,
}

/// The enclosure of a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    pub version: String,
}

/// A single appcast item, built from the newest qualifying release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub version: String,
    pub release_url: String,
    pub notes_html: String,
    pub pub_date: String,
    pub minimum_system_version: String,
    pub enclosure: Enclosure,
}

/// Internal structure for GitHub API response.
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubReleaseResponse {
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
    pub html_url: String,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<GitHubAssetResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitHubAssetResponse {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl From<GitHubAssetResponse> for Asset {
    fn from(response: GitHubAssetResponse) -> Self {
        Self {
            name: response.name,
            browser_download_url: response.browser_download_url,
            size: response.size,
        }
    }
}

impl From<GitHubReleaseResponse> for Release {
    fn from(response: GitHubReleaseResponse) -> Self {
        Self {
            tag_name: response.tag_name,
            name: response.name,
            body: response.body,
            prerelease: response.prerelease,
            draft: response.draft,
            html_url: response.html_url,
            published_at: response.published_at,
            created_at: response.created_at,
            assets: response.assets.into_iter().map(Asset::from).collect(),
        }
    }
}
