use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{AppcastError, Result};
use crate::types::{AppcastConfig, GitHubReleaseResponse, Release};

const USER_AGENT: &str = "XKey-Appcast-Generator";

/// Fetches the release list of a GitHub repository.
pub struct ReleaseFetcher {
    config: AppcastConfig,
    client: Client,
}

impl ReleaseFetcher {
    /// Creates a new ReleaseFetcher with the given configuration.
    pub fn new(config: AppcastConfig) -> Result<Self> {
        if !is_valid_repo_format(&config.repo) {
            return Err(AppcastError::InvalidRepo(config.repo.clone()));
        }

        if Url::parse(&config.base_url).is_err() {
            return Err(AppcastError::InvalidBaseUrl(config.base_url.clone()));
        }

        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    /// Fetches releases directly from the GitHub API.
    ///
    /// Releases are returned in the order the API delivers them, newest first.
    /// A non-success status is an error; nothing is retried.
    pub async fn fetch_releases(&self) -> Result<Vec<Release>> {
        let url = format!(
            "{}/repos/{}/releases",
            self.config.base_url.trim_end_matches('/'),
            self.config.repo
        );
        debug!(%url, "fetching releases");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", USER_AGENT);

        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AppcastError::ApiError { status, message });
        }

        let body = response.text().await?;
        let github_releases: Vec<GitHubReleaseResponse> = serde_json::from_str(&body)?;
        debug!(count = github_releases.len(), "received releases");

        Ok(github_releases.into_iter().map(Release::from).collect())
    }
}

/// Maximum length for a GitHub username/organization name.
/// This limit is enforced by GitHub.
const MAX_GITHUB_OWNER_LENGTH: usize = 39;

/// Maximum length for a GitHub repository name.
/// This limit is enforced by GitHub.
const MAX_GITHUB_REPO_LENGTH: usize = 100;

/// Validates that a repo string is in valid "owner/repo" format.
///
/// GitHub requirements:
/// - Owner: alphanumeric or hyphens, cannot start/end with hyphen, max 39 chars
/// - Repo: alphanumeric, hyphens, underscores, or dots, max 100 chars
fn is_valid_repo_format(repo: &str) -> bool {
    let Some((owner, name)) = repo.split_once('/') else {
        return false;
    };

    if name.contains('/') {
        return false;
    }

    is_valid_owner(owner) && is_valid_repo_name(name)
}

fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty()
        && owner.len() <= MAX_GITHUB_OWNER_LENGTH
        && !owner.starts_with('-')
        && !owner.ends_with('-')
        && owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_repo_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_GITHUB_REPO_LENGTH
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
