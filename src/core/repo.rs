use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a repository record.
pub type RecordId = Uuid;

/// Placeholder commit label given to every new record.
pub const INITIAL_COMMIT: &str = "Initial commit";

/// A repository the user keeps in the registry.
///
/// Field names serialize in camelCase so existing browser-exported registries
/// load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub id: RecordId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub last_pushed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_commit: Option<String>,
}

impl RepositoryRecord {
    /// Create a fresh record. `label` is dropped when blank.
    pub fn new(url: impl Into<String>, label: Option<String>, is_master: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            label: label.filter(|l| !l.trim().is_empty()),
            is_master,
            last_pushed: Some(Utc::now()),
            last_commit: Some(INITIAL_COMMIT.to_string()),
        }
    }

    /// The label if one was given, otherwise the URL.
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.url)
    }
}

/// Push strategy chosen by the user. Recorded and reported, never applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PushType {
    #[default]
    Regular,
    Force,
    ForceWithLease,
}

impl PushType {
    pub fn label(&self) -> &'static str {
        match self {
            PushType::Regular => "regular",
            PushType::Force => "force",
            PushType::ForceWithLease => "force-with-lease",
        }
    }
}

/// Owner and repository name parsed out of a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub owner: String,
    pub repo_name: String,
}
