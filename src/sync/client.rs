use std::time::Duration;

use tracing::debug;

use super::{OperationRequest, OperationResponse};
use crate::forge::ForgeError;

/// Posts operations to a running sync service.
pub struct SyncClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SyncClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ForgeError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Send one operation. A `500` still yields the decoded failure body.
    pub async fn send(&self, request: &OperationRequest) -> Result<OperationResponse, ForgeError> {
        debug!(endpoint = %self.endpoint, kind = request.kind.label(), "posting operation");
        let resp = self.http.post(&self.endpoint).json(request).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            ForgeError::Decode(format!("sync service answered {status} with unreadable body: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::SourceControl;
    use crate::sync::handler::tests::{FakeForge, seeded_index};
    use crate::sync::server::build_router;
    use crate::sync::{OperationType, SyncService};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    async fn spawn_service() -> Option<String> {
        let forge: Arc<dyn SourceControl> = Arc::new(FakeForge::default());
        let app = build_router(Arc::new(SyncService::new(seeded_index(), Some(forge))));
        let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
        let addr = listener.local_addr().ok()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Some(format!("http://{addr}/git-operations"))
    }

    #[tokio::test]
    async fn round_trip_success_and_failure() {
        let Some(endpoint) = spawn_service().await else {
            eprintln!("skipping: cannot bind test server");
            return;
        };
        let client = SyncClient::new(&endpoint, Duration::from_secs(5)).unwrap();

        let ok = client
            .send(&OperationRequest {
                kind: OperationType::Push,
                source_repo_id: Some("stage".into()),
                target_repo_id: Some("prod".into()),
                push_type: Some("regular".into()),
            })
            .await
            .unwrap();
        assert!(ok.success);
        assert_eq!(ok.message.as_deref(), Some("Push operation completed successfully"));

        let failed = client
            .send(&OperationRequest {
                kind: OperationType::GetLastCommit,
                source_repo_id: Some("missing".into()),
                target_repo_id: None,
                push_type: None,
            })
            .await
            .unwrap();
        assert!(!failed.success);
        assert!(failed.error.unwrap().contains("repository not found"));
    }
}
