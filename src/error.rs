// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Clone failed: {0}")]
    Clone(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Branch listing failed: {0}")]
    ListBranches(String),

    #[error("Checkout of {branch} failed: {message}")]
    Checkout { branch: String, message: String },

    #[error("Staging failed: {0}")]
    Stage(String),

    #[error("Status query failed: {0}")]
    Status(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RepositoryError {
    pub fn checkout(branch: &str, message: impl Into<String>) -> Self {
        Self::Checkout {
            branch: branch.to_string(),
            message: message.into(),
        }
    }

    pub fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }
}
