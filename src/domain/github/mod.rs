//! GitHub repository domain types and the fetcher seam
//!
//! The fetcher is an outbound collaborator invoked only after a successful
//! key consumption; its failures never roll the usage increment back.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::domain::DomainError;

/// A parsed `owner/repo` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse a GitHub repository URL into an owner/repo pair.
    ///
    /// Accepts `https://github.com/owner/repo` with or without a trailing
    /// slash or extra path segments (`/tree/main`, `.git`).
    pub fn parse(url: &str) -> Result<Self, DomainError> {
        let trimmed = url.trim();
        let rest = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .ok_or_else(|| {
                DomainError::validation(format!("Not a GitHub repository URL: {trimmed}"))
            })?;

        let mut parts = rest.split('/').filter(|s| !s.is_empty());
        let owner = parts.next().ok_or_else(|| {
            DomainError::validation("GitHub URL is missing the repository owner")
        })?;
        let repo = parts.next().ok_or_else(|| {
            DomainError::validation("GitHub URL is missing the repository name")
        })?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.trim_end_matches(".git").to_string(),
        })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Repository metadata surfaced alongside the summary
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RepoMetadata {
    pub stars: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub forks: i64,
    pub open_issues: i64,
}

/// Outbound collaborator fetching repository data from GitHub
#[async_trait]
pub trait RepoFetcher: Send + Sync + Debug {
    /// Fetch the raw README contents
    async fn fetch_readme(&self, repo: &RepoRef) -> Result<String, DomainError>;

    /// Fetch repository metadata (stars, latest release, ...)
    async fn fetch_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_url() {
        let repo = RepoRef::parse("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.repo, "rust");
    }

    #[test]
    fn test_parse_trailing_slash_and_segments() {
        let repo = RepoRef::parse("https://github.com/rust-lang/rust/tree/master/src").unwrap();
        assert_eq!(repo.to_string(), "rust-lang/rust");

        let repo = RepoRef::parse("https://github.com/rust-lang/rust/").unwrap();
        assert_eq!(repo.to_string(), "rust-lang/rust");
    }

    #[test]
    fn test_parse_git_suffix() {
        let repo = RepoRef::parse("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(repo.repo, "rust");
    }

    #[test]
    fn test_parse_rejects_non_github() {
        assert!(RepoRef::parse("https://gitlab.com/a/b").is_err());
        assert!(RepoRef::parse("not a url").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_repo() {
        assert!(RepoRef::parse("https://github.com/only-owner").is_err());
        assert!(RepoRef::parse("https://github.com/").is_err());
    }
}
