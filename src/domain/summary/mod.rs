//! README summarization seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Structured summary produced from a repository README
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoSummary {
    /// A concise summary of the repository
    pub summary: String,
    /// Interesting facts or notable features pulled from the README
    pub cool_facts: Vec<String>,
}

/// Outbound collaborator turning README text into a structured summary
#[async_trait]
pub trait ReadmeSummarizer: Send + Sync + Debug {
    async fn summarize(&self, readme: &str) -> Result<RepoSummary, DomainError>;
}
