// file: src/repository/file_writer.rs
// description: working-tree file writes, deletions and existence checks
// reference: https://docs.rs/tokio/latest/tokio/fs

use crate::error::{RepositoryError, Result};
use crate::repository::provider::FileWriter;
use crate::utils::validation::Validator;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// [`FileWriter`] rooted at a repository working directory.
#[derive(Debug, Clone)]
pub struct WorkdirFileWriter {
    root: PathBuf,
}

impl WorkdirFileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `path` onto the root and checks that the nearest existing
    /// ancestor does not leave the root through a symlink.
    async fn resolve(&self, path: &str) -> Result<PathBuf> {
        Validator::validate_relative_path(path)?;
        let target = self.root.join(path);

        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|e| RepositoryError::file_operation(&self.root, e))?;

        let mut ancestor = target.parent();
        while let Some(dir) = ancestor {
            match fs::canonicalize(dir).await {
                Ok(real) => {
                    if !real.starts_with(&root) {
                        return Err(escapes_root(path));
                    }
                    break;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => ancestor = dir.parent(),
                Err(e) => return Err(RepositoryError::file_operation(dir, e)),
            }
        }

        // a symlinked leaf would redirect the write itself
        if let Ok(meta) = fs::symlink_metadata(&target).await
            && meta.file_type().is_symlink()
        {
            match fs::canonicalize(&target).await {
                Ok(real) if real.starts_with(&root) => {}
                _ => return Err(escapes_root(path)),
            }
        }

        Ok(target)
    }
}

fn escapes_root(path: &str) -> RepositoryError {
    RepositoryError::Validation(format!("Path resolves outside the repository: {}", path))
}

#[async_trait]
impl FileWriter for WorkdirFileWriter {
    async fn write(&self, path: &str, content: &str) -> Result<()> {
        let target = self.resolve(path).await?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::file_operation(parent, e))?;
        }

        fs::write(&target, content)
            .await
            .map_err(|e| RepositoryError::file_operation(&target, e))?;

        debug!("Wrote {} ({} bytes)", path, content.len());
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path).await?;

        match fs::remove_file(&target).await {
            Ok(()) => {
                debug!("Deleted {}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Delete of {} skipped, file not present", path);
                Ok(())
            }
            Err(e) => Err(RepositoryError::file_operation(&target, e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let target = self.resolve(path).await?;
        fs::try_exists(&target)
            .await
            .map_err(|e| RepositoryError::file_operation(&target, e))
    }
}
