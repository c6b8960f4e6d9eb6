//! GitHub REST backend.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use super::{CommitInfo, ForgeError, SourceControl};
use crate::config::types::GithubConfig;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repodeck/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &GithubConfig, token: String) -> Result<Self, ForgeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.api_url))
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.api_url))
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

/// Turn a non-success response into `ForgeError::Api`, keeping the body.
async fn check(resp: Response) -> Result<Response, ForgeError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    warn!(%status, %message, "upstream API returned non-success");
    Err(ForgeError::Api {
        status: status.as_u16(),
        message,
        body,
    })
}

#[async_trait::async_trait]
impl SourceControl for GitHubClient {
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String, ForgeError> {
        let resp = check(self.get(&format!("/repos/{owner}/{repo}")).send().await?).await?;
        let body: serde_json::Value = resp.json().await?;

        let branch = body
            .get("default_branch")
            .and_then(|b| b.as_str())
            .ok_or_else(|| ForgeError::Decode("repository payload has no default_branch".into()))?;
        debug!(owner, repo, branch, "resolved default branch");
        Ok(branch.to_string())
    }

    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<CommitInfo, ForgeError> {
        let resp = check(
            self.get(&format!("/repos/{owner}/{repo}/commits/{reference}"))
                .send()
                .await?,
        )
        .await?;
        CommitInfo::from_payload(resp.json().await?)
    }

    async fn merge(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<Option<serde_json::Value>, ForgeError> {
        let resp = self
            .post(&format!("/repos/{owner}/{repo}/merges"))
            .json(&json!({
                "base": base,
                "head": head,
                "commit_message": message,
            }))
            .send()
            .await?;
        let resp = check(resp).await?;

        // 204: base already contains head.
        if resp.status() == StatusCode::NO_CONTENT {
            debug!(owner, repo, base, head, "nothing to merge");
            return Ok(None);
        }
        Ok(Some(resp.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::StatusCode as AxumStatus,
        routing::{get, post},
    };
    use serde_json::Value;
    use tokio::net::TcpListener;

    /// Serve a tiny fake of the three GitHub endpoints on a free port.
    async fn fake_github() -> Option<String> {
        let app = Router::new()
            .route(
                "/repos/{owner}/{repo}",
                get(|Path((owner, repo)): Path<(String, String)>| async move {
                    if repo == "missing" {
                        return (AxumStatus::NOT_FOUND, Json(json!({ "message": "Not Found" })));
                    }
                    (
                        AxumStatus::OK,
                        Json(json!({ "full_name": format!("{owner}/{repo}"), "default_branch": "trunk" })),
                    )
                }),
            )
            .route(
                "/repos/{owner}/{repo}/commits/{reference}",
                get(|Path((_, _, reference)): Path<(String, String, String)>| async move {
                    Json(json!({
                        "sha": format!("sha-of-{reference}"),
                        "commit": { "author": { "date": "2024-05-06T07:08:09Z" } }
                    }))
                }),
            )
            .route(
                "/repos/{owner}/{repo}/merges",
                post(|Json(body): Json<Value>| async move {
                    if body["head"] == "already-merged" {
                        return (AxumStatus::NO_CONTENT, Json(Value::Null));
                    }
                    (AxumStatus::CREATED, Json(json!({ "sha": "merge-sha", "echo": body })))
                }),
            );

        // Skip when the sandbox forbids binding.
        let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
        let addr = listener.local_addr().ok()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Some(format!("http://{addr}"))
    }

    fn client(api_url: String) -> GitHubClient {
        let cfg = GithubConfig {
            api_url,
            ..GithubConfig::default()
        };
        GitHubClient::new(&cfg, "test-token".into()).unwrap()
    }

    #[tokio::test]
    async fn resolves_branch_commit_and_merge() {
        let Some(url) = fake_github().await else {
            eprintln!("skipping: cannot bind test server");
            return;
        };
        let gh = client(format!("{url}/"));

        assert_eq!(gh.default_branch("acme", "widget").await.unwrap(), "trunk");

        let commit = gh.get_commit("acme", "widget", "trunk").await.unwrap();
        assert_eq!(commit.sha, "sha-of-trunk");
        assert_eq!(commit.author_date.as_deref(), Some("2024-05-06T07:08:09Z"));

        let merged = gh
            .merge("acme", "prod", "main", "sha-of-trunk", "Merge from Stage")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged["sha"], "merge-sha");
        assert_eq!(merged["echo"]["commit_message"], "Merge from Stage");
        assert_eq!(merged["echo"]["base"], "main");

        let nothing = gh
            .merge("acme", "prod", "main", "already-merged", "m")
            .await
            .unwrap();
        assert!(nothing.is_none());
    }

    #[tokio::test]
    async fn not_found_carries_body() {
        let Some(url) = fake_github().await else {
            eprintln!("skipping: cannot bind test server");
            return;
        };
        let gh = client(url);

        let err = gh.default_branch("acme", "missing").await.unwrap_err();
        match err {
            ForgeError::Api { status, ref message, .. } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
                assert_eq!(err.details().unwrap()["message"], "Not Found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
