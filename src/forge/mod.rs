//! Source-control host API.
//!
//! The sync service only needs three calls: look up a repository's default
//! branch, read the commit at a ref, and merge a ref into a branch. They sit
//! behind [`SourceControl`] so the service can be driven without a network.

pub mod github;

use serde::Serialize;
use thiserror::Error;

pub use github::GitHubClient;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream API returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    #[error("unexpected upstream response: {0}")]
    Decode(String),
}

impl ForgeError {
    /// Upstream response body, when the failure came from the API itself.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            ForgeError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// A commit as returned by the host, with the raw payload kept for callers
/// that forward it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitInfo {
    pub sha: String,
    pub author_date: Option<String>,
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl CommitInfo {
    /// Pull `sha` and `commit.author.date` out of a commit payload.
    pub fn from_payload(raw: serde_json::Value) -> Result<Self, ForgeError> {
        let sha = raw
            .get("sha")
            .and_then(|s| s.as_str())
            .ok_or_else(|| ForgeError::Decode("commit payload has no sha".into()))?
            .to_string();
        let author_date = raw
            .pointer("/commit/author/date")
            .and_then(|d| d.as_str())
            .map(String::from);
        Ok(Self {
            sha,
            author_date,
            raw,
        })
    }
}

/// The host operations the sync service relies on.
#[async_trait::async_trait]
pub trait SourceControl: Send + Sync {
    /// Name of the repository's default branch.
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String, ForgeError>;

    /// The commit `reference` points at.
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<CommitInfo, ForgeError>;

    /// Merge `head` into `base`. `None` means there was nothing to merge.
    async fn merge(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<Option<serde_json::Value>, ForgeError>;
}
