use std::path::PathBuf;
use thiserror::Error;

use crate::forge::ForgeError;

#[derive(Error, Debug)]
pub enum RepodeckError {
    #[error("repository URL is required")]
    MissingUrl,

    #[error("both source and target repositories must be selected")]
    MissingSelection,

    #[error("no push is waiting for confirmation")]
    NothingToConfirm,

    #[error("invalid repository URL format: {0}")]
    InvalidRepositoryUrl(String),

    #[error("repository not found: {0}")]
    RepoNotFound(String),

    #[error("source or target repository not found")]
    PairNotFound,

    #[error("store error at {path}: {source}")]
    Store {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("index error: {0}")]
    Index(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("GitHub token not configured")]
    MissingToken,

    #[error(transparent)]
    Forge(#[from] ForgeError),
}

pub type Result<T> = std::result::Result<T, RepodeckError>;
