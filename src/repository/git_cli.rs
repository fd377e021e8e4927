// file: src/repository/git_cli.rs
// description: VcsProvider backed by the system git binary
// reference: https://git-scm.com/docs/git-status#_porcelain_format_version_1

use crate::config::{GitConfig, RepositoryConfig};
use crate::error::{RepositoryError, Result};
use crate::models::{BranchSummary, CommitSummary, StatusSummary};
use crate::repository::provider::VcsProvider;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

pub struct GitCliProvider {
    workdir: PathBuf,
    origin_url: String,
    binary: String,
    remote: String,
    env_vars: Vec<(String, String)>,
}

impl GitCliProvider {
    pub fn new(repository: &RepositoryConfig, git: &GitConfig) -> Self {
        let mut env_vars = Vec::new();
        if let (Some(name), Some(email)) = (&git.author_name, &git.author_email) {
            for key in ["GIT_AUTHOR_NAME", "GIT_COMMITTER_NAME"] {
                env_vars.push((key.to_string(), name.clone()));
            }
            for key in ["GIT_AUTHOR_EMAIL", "GIT_COMMITTER_EMAIL"] {
                env_vars.push((key.to_string(), email.clone()));
            }
        }

        Self {
            workdir: repository.repository_dir.clone(),
            origin_url: repository.origin_url.clone(),
            binary: git.binary.clone(),
            remote: git.remote.clone(),
            env_vars,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Clone the origin into the working directory unless a repository is
    /// already there. Returns whether a clone happened.
    pub async fn clone_if_missing(&self) -> Result<bool> {
        if self.workdir.join(".git").exists() {
            debug!("Repository already present at {}", self.workdir.display());
            return Ok(false);
        }

        if let Some(parent) = self.workdir.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::file_operation(parent, e))?;
        }

        info!(
            "Cloning {} into {}",
            self.origin_url,
            self.workdir.display()
        );

        let workdir = self.workdir.to_string_lossy().into_owned();
        self.run_in(
            None,
            &[
                "clone",
                "--origin",
                self.remote.as_str(),
                self.origin_url.as_str(),
                workdir.as_str(),
            ],
        )
        .await
        .map_err(RepositoryError::Clone)?;

        Ok(true)
    }

    async fn run(&self, args: &[&str]) -> std::result::Result<String, String> {
        self.run_in(Some(&self.workdir), args).await
    }

    #[instrument(skip(self, dir), fields(git = %self.binary))]
    async fn run_in(
        &self,
        dir: Option<&Path>,
        args: &[&str],
    ) -> std::result::Result<String, String> {
        let subcommand = args.first().copied().unwrap_or_default();

        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        for (k, v) in &self.env_vars {
            cmd.env(k, v);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!("spawning git {}", subcommand);

        let output = cmd
            .output()
            .await
            .map_err(|e| format!("failed to spawn git {}: {}", subcommand, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(format!(
                "git {} failed (status {}): {}",
                subcommand, output.status, detail
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VcsProvider for GitCliProvider {
    async fn fetch(&self) -> Result<()> {
        self.run(&["fetch", self.remote.as_str()])
            .await
            .map_err(RepositoryError::Fetch)?;
        Ok(())
    }

    async fn list_branches(&self) -> Result<BranchSummary> {
        let stdout = self
            .run(&[
                "for-each-ref",
                "--format=%(refname:short)",
                "refs/heads",
                "refs/remotes",
            ])
            .await
            .map_err(RepositoryError::ListBranches)?;

        Ok(parse_branch_list(&stdout))
    }

    async fn checkout_local_branch(&self, name: &str) -> Result<()> {
        self.run(&["checkout", "-b", name])
            .await
            .map_err(|e| RepositoryError::checkout(name, e))?;
        Ok(())
    }

    async fn checkout(&self, name: &str) -> Result<()> {
        self.run(&["checkout", name])
            .await
            .map_err(|e| RepositoryError::checkout(name, e))?;
        Ok(())
    }

    async fn status(&self) -> Result<StatusSummary> {
        let stdout = self
            .run(&["status", "--porcelain=v1", "-z"])
            .await
            .map_err(RepositoryError::Status)?;

        Ok(parse_porcelain_status(&stdout))
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        let mut args = vec!["add", "--all", "--"];
        args.extend(paths.iter().map(String::as_str));

        self.run(&args).await.map_err(RepositoryError::Stage)?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<CommitSummary> {
        self.run(&["commit", "-m", message])
            .await
            .map_err(RepositoryError::Commit)?;

        let head = self
            .run(&["rev-parse", "HEAD"])
            .await
            .map_err(RepositoryError::Commit)?;

        Ok(CommitSummary {
            commit: head.trim().to_string(),
        })
    }

    async fn push(&self) -> Result<()> {
        // Branches created with `checkout -b` have no upstream yet.
        self.run(&["push", "--set-upstream", self.remote.as_str(), "HEAD"])
            .await
            .map_err(RepositoryError::Push)?;
        Ok(())
    }

    fn remote_name(&self) -> &str {
        &self.remote
    }
}

fn parse_branch_list(stdout: &str) -> BranchSummary {
    let all = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    BranchSummary::new(all)
}

/// Parse `git status --porcelain=v1 -z`.
///
/// Only the index column is considered. Rename and copy entries carry the
/// source path as an extra NUL-separated field, which is skipped.
fn parse_porcelain_status(stdout: &str) -> StatusSummary {
    let mut summary = StatusSummary::default();
    let mut entries = stdout.split('\0');

    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }

        let index = entry.as_bytes()[0];
        let path = entry[3..].to_string();

        match index {
            b'R' => {
                entries.next();
                summary.renamed.push(path);
            }
            b'C' => {
                entries.next();
                summary.staged.push(path);
            }
            b'M' | b'A' | b'D' | b'T' => summary.staged.push(path),
            _ => {}
        }
    }

    summary
}
