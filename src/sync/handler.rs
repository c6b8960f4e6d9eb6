use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info};

use super::{OperationRequest, OperationResponse, OperationType};
use crate::core::index::{Index, SharedRepository};
use crate::core::remote_url::parse_github_url;
use crate::error::{RepodeckError, Result};
use crate::forge::SourceControl;

/// Executes operations against the shared table and the source-control host.
///
/// `forge` is `None` when no access token was configured; every request then
/// fails with "GitHub token not configured" before touching anything.
pub struct SyncService {
    index: Mutex<Index>,
    forge: Option<Arc<dyn SourceControl>>,
}

impl SyncService {
    pub fn new(index: Index, forge: Option<Arc<dyn SourceControl>>) -> Self {
        Self {
            index: Mutex::new(index),
            forge,
        }
    }

    /// Run an operation, folding any failure into the error response shape.
    pub async fn handle(&self, request: OperationRequest) -> OperationResponse {
        info!(
            kind = request.kind.label(),
            source = ?request.source_repo_id,
            target = ?request.target_repo_id,
            push_type = ?request.push_type,
            "received operation"
        );

        match self.dispatch(&request).await {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, "git operation failed");
                let details = match &e {
                    RepodeckError::Forge(f) => f.details().cloned(),
                    _ => None,
                };
                OperationResponse::failure(e.to_string(), details)
            }
        }
    }

    async fn dispatch(&self, request: &OperationRequest) -> Result<OperationResponse> {
        let forge = self.forge.as_deref().ok_or(RepodeckError::MissingToken)?;
        let source_id = request.source_repo_id.as_deref().unwrap_or_default();

        match (&request.kind, request.target_repo_id.as_deref()) {
            (OperationType::GetLastCommit, _) => self.last_commit(forge, source_id).await,
            (OperationType::Push, Some(target_id)) => self.push(forge, source_id, target_id).await,
            (kind, _) => Ok(OperationResponse {
                success: true,
                message: Some(format!("Git {} operation completed successfully", kind.label())),
                timestamp: Some(Utc::now()),
                ..Default::default()
            }),
        }
    }

    async fn last_commit(&self, forge: &dyn SourceControl, id: &str) -> Result<OperationResponse> {
        let repo = self
            .index
            .lock()
            .await
            .get_repository(id)?
            .ok_or_else(|| RepodeckError::RepoNotFound(id.to_string()))?;
        info!(url = %repo.url, "found repository");

        let remote = parse_github_url(&repo.url)?;
        let branch = forge.default_branch(&remote.owner, &remote.repo_name).await?;
        let commit = forge
            .get_commit(&remote.owner, &remote.repo_name, &branch)
            .await?;
        info!(sha = %commit.sha, %branch, "got commit");

        self.index.lock().await.record_commit(
            id,
            &commit.sha,
            commit.author_date.as_deref(),
            Utc::now(),
        )?;

        Ok(OperationResponse {
            success: true,
            commit: Some(commit.raw),
            ..Default::default()
        })
    }

    async fn push(
        &self,
        forge: &dyn SourceControl,
        source_id: &str,
        target_id: &str,
    ) -> Result<OperationResponse> {
        let (source, target) = self.load_pair(source_id, target_id).await?;
        info!(source = %source.url, target = %target.url, "found repositories");

        let src = parse_github_url(&source.url)?;
        let dst = parse_github_url(&target.url)?;

        let src_branch = forge.default_branch(&src.owner, &src.repo_name).await?;
        let dst_branch = forge.default_branch(&dst.owner, &dst.repo_name).await?;
        info!(source = %src_branch, target = %dst_branch, "default branches");

        let head = forge
            .get_commit(&src.owner, &src.repo_name, &src_branch)
            .await?;
        info!(sha = %head.sha, "got source commit");

        let message = format!("Merge from {}", source.display_name());
        let merge = forge
            .merge(&dst.owner, &dst.repo_name, &dst_branch, &head.sha, &message)
            .await?;
        info!(merged = merge.is_some(), "merge finished");

        self.index
            .lock()
            .await
            .mark_synced(&[source_id, target_id], Utc::now())?;

        Ok(OperationResponse {
            success: true,
            message: Some("Push operation completed successfully".into()),
            merge_result: Some(merge.unwrap_or(serde_json::Value::Null)),
            ..Default::default()
        })
    }

    async fn load_pair(
        &self,
        source_id: &str,
        target_id: &str,
    ) -> Result<(SharedRepository, SharedRepository)> {
        let rows = self
            .index
            .lock()
            .await
            .get_repositories(&[source_id, target_id])?;
        let pick = |id: &str| rows.iter().find(|r| r.id == id).cloned();
        match (pick(source_id), pick(target_id)) {
            (Some(s), Some(t)) => Ok((s, t)),
            _ => Err(RepodeckError::PairNotFound),
        }
    }

    /// Access the shared table, e.g. to seed it.
    pub async fn index(&self) -> tokio::sync::MutexGuard<'_, Index> {
        self.index.lock().await
    }
}
