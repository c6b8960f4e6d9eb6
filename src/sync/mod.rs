//! The push/sync service: resolves repositories in the shared table, talks to
//! the source-control host, and writes status back.

pub mod client;
pub mod handler;
pub mod server;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::SyncClient;
pub use handler::SyncService;

/// Operation requested by a caller. Unrecognised names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationType {
    Push,
    Sync,
    GetLastCommit,
    Delete,
    Other(String),
}

impl OperationType {
    pub fn label(&self) -> &str {
        match self {
            OperationType::Push => "push",
            OperationType::Sync => "sync",
            OperationType::GetLastCommit => "getLastCommit",
            OperationType::Delete => "delete",
            OperationType::Other(name) => name,
        }
    }
}

impl From<String> for OperationType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "push" => OperationType::Push,
            "sync" => OperationType::Sync,
            "getLastCommit" => OperationType::GetLastCommit,
            "delete" => OperationType::Delete,
            _ => OperationType::Other(name),
        }
    }
}

impl From<OperationType> for String {
    fn from(kind: OperationType) -> Self {
        match kind {
            OperationType::Other(name) => name,
            known => known.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    #[serde(rename = "type")]
    pub kind: OperationType,
    #[serde(default)]
    pub source_repo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_repo_id: Option<String>,
    /// Echoed in logs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_type: Option<String>,
}

/// Response body. Success and failure share one shape; absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<serde_json::Value>,
    /// `Some(Value::Null)` when the merge had nothing to do.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl OperationResponse {
    pub fn failure(error: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            details,
            ..Default::default()
        }
    }
}
