use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sync state of a row in the shared table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
}

/// A repository as the sync service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedRepository {
    pub id: String,
    pub url: String,
    pub nickname: Option<String>,
    pub last_commit: Option<String>,
    /// Author date of `last_commit`, as reported upstream.
    pub last_commit_date: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
    pub status: SyncStatus,
}

impl SharedRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>, nickname: Option<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            nickname,
            last_commit: None,
            last_commit_date: None,
            last_sync: None,
            status: SyncStatus::Pending,
        }
    }

    /// Nickname if set, otherwise the URL.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.url)
    }
}

/// Internal row struct for mapping SQL columns to SharedRepository.
pub(super) struct RepositoryRow {
    pub id: String,
    pub url: String,
    pub nickname: Option<String>,
    pub last_commit: Option<String>,
    pub last_commit_date: Option<String>,
    pub last_sync: Option<String>,
    pub status: String,
}

impl RepositoryRow {
    pub fn into_repository(self) -> SharedRepository {
        let status = serde_plain::from_str(&self.status).unwrap_or(SyncStatus::Pending);
        let last_sync = self
            .last_sync
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.to_utc());

        SharedRepository {
            id: self.id,
            url: self.url,
            nickname: self.nickname,
            last_commit: self.last_commit,
            last_commit_date: self.last_commit_date,
            last_sync,
            status,
        }
    }
}
