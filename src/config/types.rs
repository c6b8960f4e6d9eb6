use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepodeckConfig {
    pub storage: StorageConfig,
    pub github: GithubConfig,
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub safety: SafetyConfig,
}

/// Where local state lives. `None` means the XDG data dir default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub registry_path: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    /// Name of the environment variable holding the access token.
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".into(),
            token_env: "GITHUB_ACCESS_TOKEN".into(),
            timeout_secs: 30,
        }
    }
}

impl GithubConfig {
    /// Read the token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".into(),
        }
    }
}

/// The sync service that `push --remote` and `last-commit` talk to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// One warning per confirmation step before a push lands on master.
    pub master_warnings: [String; 3],
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            master_warnings: [
                "This is a master repository. Are you sure you want to proceed with the push operation?".into(),
                "Please confirm again. This action will modify the master repository.".into(),
                "Final confirmation required. This action cannot be undone.".into(),
            ],
        }
    }
}
