//! HTTP front for [`SyncService`].
//!
//! | Method    | Path              | Body                   |
//! |-----------|-------------------|------------------------|
//! | `POST`    | `/`               | `OperationRequest`     |
//! | `POST`    | `/git-operations` | `OperationRequest`     |
//! | `OPTIONS` | any               | `200`, CORS headers    |
//! | `GET`     | `/health`         | answers `ok`           |
//!
//! Success is `200`; every failure is `500` with `{ success: false, error, details? }`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderName, StatusCode, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use super::{OperationRequest, OperationResponse, SyncService};
use crate::config;
use crate::config::types::RepodeckConfig;
use crate::core::index::Index;
use crate::forge::{GitHubClient, SourceControl};

/// Build the router with CORS applied.
pub fn build_router(service: Arc<SyncService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/", post(operation_handler))
        .route("/git-operations", post(operation_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(service)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn operation_handler(
    State(service): State<Arc<SyncService>>,
    body: Bytes,
) -> (StatusCode, Json<OperationResponse>) {
    let request: OperationRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "rejecting malformed operation body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(OperationResponse::failure(
                    format!("invalid request body: {e}"),
                    None,
                )),
            );
        }
    };

    let response = service.handle(request).await;
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response))
}

/// Open the shared table, build the GitHub client when a token is present,
/// and serve until the process is stopped.
pub async fn serve(cfg: &RepodeckConfig, bind: Option<&str>) -> anyhow::Result<()> {
    let index = Index::open(&config::index_path(cfg))?;

    let forge: Option<Arc<dyn SourceControl>> = match cfg.github.token() {
        Some(token) => Some(Arc::new(GitHubClient::new(&cfg.github, token)?)),
        None => {
            warn!(
                env = %cfg.github.token_env,
                "no GitHub token set; operations will fail until one is configured"
            );
            None
        }
    };

    let service = Arc::new(SyncService::new(index, forge));
    let app = build_router(service);

    let bind = bind.unwrap_or(cfg.server.bind.as_str());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address: {bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "sync service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("sync service stopped unexpectedly")?;
    Ok(())
}
