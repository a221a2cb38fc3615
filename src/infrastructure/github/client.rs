//! GitHub REST API client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::github::{RepoFetcher, RepoMetadata, RepoRef};
use crate::domain::DomainError;

const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";
const README_ACCEPT: &str = "application/vnd.github.v3.raw";

/// GitHub REST API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build GitHub client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        })
    }

    pub fn with_defaults() -> Result<Self, DomainError> {
        Self::new(DEFAULT_GITHUB_BASE_URL, "dandi-gateway", 30)
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, DomainError> {
        self.client
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| DomainError::provider("github", format!("Request failed: {}", e)))
    }

    async fn fetch_repo(&self, repo: &RepoRef) -> Result<RepoResponse, DomainError> {
        let url = format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.repo);
        let response = self.get(&url, "application/vnd.github+json").await?;

        if !response.status().is_success() {
            return Err(DomainError::provider(
                "github",
                format!("GitHub API returned {}", response.status().as_u16()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::provider("github", format!("Invalid repo payload: {}", e)))
    }

    /// Latest release is optional on GitHub, so every failure here
    /// degrades to `None` instead of failing the whole lookup.
    async fn fetch_latest_release(&self, repo: &RepoRef) -> Option<String> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.base_url, repo.owner, repo.repo
        );

        let response = self.get(&url, "application/vnd.github+json").await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let release: ReleaseResponse = response.json().await.ok()?;
        release.tag_name
    }
}

#[async_trait]
impl RepoFetcher for GitHubClient {
    async fn fetch_readme(&self, repo: &RepoRef) -> Result<String, DomainError> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, repo.owner, repo.repo);
        let response = self.get(&url, README_ACCEPT).await?;

        if !response.status().is_success() {
            return Err(DomainError::provider(
                "github",
                format!("GitHub API returned {}", response.status().as_u16()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::provider("github", format!("Invalid README payload: {}", e)))
    }

    async fn fetch_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, DomainError> {
        let (repo_info, latest_version) =
            tokio::join!(self.fetch_repo(repo), self.fetch_latest_release(repo));

        let repo_info = repo_info?;

        Ok(RepoMetadata {
            stars: repo_info.stargazers_count,
            latest_version,
            description: repo_info.description,
            language: repo_info.language,
            forks: repo_info.forks_count,
            open_issues: repo_info.open_issues_count,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    stargazers_count: i64,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    forks_count: i64,
    #[serde(default)]
    open_issues_count: i64,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: Option<String>,
}
