// file: src/repository/provider.rs
// description: capability traits consumed by the repository client
// reference: https://docs.rs/async-trait

use crate::error::Result;
use crate::models::{BranchSummary, CommitSummary, StatusSummary};
use async_trait::async_trait;

/// Version-control operations against one working tree and its remote.
///
/// Every method may block on the network or on disk. Failures are returned
/// as-is to the caller; implementations should not retry.
#[async_trait]
pub trait VcsProvider: Send + Sync {
    async fn fetch(&self) -> Result<()>;

    /// Local and remote-qualified (`origin/<name>`) branch names.
    async fn list_branches(&self) -> Result<BranchSummary>;

    /// Create `name` from the current HEAD and switch to it. No upstream is set.
    async fn checkout_local_branch(&self, name: &str) -> Result<()>;

    async fn checkout(&self, name: &str) -> Result<()>;

    async fn status(&self) -> Result<StatusSummary>;

    async fn add(&self, paths: &[String]) -> Result<()>;

    async fn commit(&self, message: &str) -> Result<CommitSummary>;

    async fn push(&self) -> Result<()>;

    /// Remote name used to qualify branch names, `origin` unless overridden.
    fn remote_name(&self) -> &str {
        "origin"
    }
}

/// File access scoped to the working tree. Paths are relative to its root.
#[async_trait]
pub trait FileWriter: Send + Sync {
    async fn write(&self, path: &str, content: &str) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;
}
