// file: src/repository/client.rs
// description: branch checkout and commit-and-push orchestration over a working tree
// reference: sequential pipeline over injected vcs and file collaborators

use crate::config::{Config, RepositoryConfig};
use crate::error::Result;
use crate::models::{FileAction, FileChange};
use crate::repository::file_writer::WorkdirFileWriter;
use crate::repository::git_cli::GitCliProvider;
use crate::repository::provider::{FileWriter, VcsProvider};
use crate::utils::logging::DiagnosticLogger;
use crate::utils::telemetry::OperationTimer;
use crate::utils::validation::Validator;
use std::sync::Arc;
use tracing::{debug, info};

/// Applies generated change sets to branches of one repository.
///
/// A client is bound to a single working directory and must not be used
/// from concurrent tasks; callers serialize `checkout`/`commit` per
/// repository. Clients bound to different directories are independent.
pub struct RepositoryClient<V, F> {
    config: RepositoryConfig,
    vcs: V,
    files: F,
    logger: Arc<dyn DiagnosticLogger>,
}

impl RepositoryClient<GitCliProvider, WorkdirFileWriter> {
    /// Client backed by the system git binary, cloning the origin first when
    /// `git.clone_if_missing` is set and no repository exists yet.
    pub async fn open(config: &Config, logger: Arc<dyn DiagnosticLogger>) -> Result<Self> {
        let vcs = GitCliProvider::new(&config.repository, &config.git);
        if config.git.clone_if_missing && vcs.clone_if_missing().await? {
            logger.info(&format!(
                "Cloned {} into {}",
                config.repository.origin_url,
                config.repository.repository_dir.display()
            ));
        }

        let files = WorkdirFileWriter::new(config.repository.repository_dir.clone());
        Ok(Self::new(config.repository.clone(), vcs, files, logger))
    }
}

impl<V, F> RepositoryClient<V, F>
where
    V: VcsProvider,
    F: FileWriter,
{
    pub fn new(
        config: RepositoryConfig,
        vcs: V,
        files: F,
        logger: Arc<dyn DiagnosticLogger>,
    ) -> Self {
        Self {
            config,
            vcs,
            files,
            logger,
        }
    }

    /// Leave the working tree on a local branch named `branch_name`.
    ///
    /// Remote state is always fetched first. If the remote has no such
    /// branch it is created locally without an upstream; otherwise the
    /// existing branch is checked out.
    pub async fn checkout(&self, branch_name: &str) -> Result<()> {
        Validator::validate_branch_name(branch_name)?;
        let timer = OperationTimer::new(&format!("checkout {}", branch_name));

        self.vcs.fetch().await?;

        let branches = self.vcs.list_branches().await?;
        let remote = self.vcs.remote_name();

        if branches.contains_remote(remote, branch_name) {
            debug!("{}/{} exists, checking out", remote, branch_name);
            self.vcs.checkout(branch_name).await?;
        } else {
            info!(
                "{}/{} not found, creating local branch",
                remote, branch_name
            );
            self.vcs.checkout_local_branch(branch_name).await?;
        }

        timer.finish();
        Ok(())
    }

    /// Apply `files` on `branch_name`, commit them with `message` and push.
    ///
    /// Returns the new revision id, or an empty string when nothing ended up
    /// staged, in which case no commit or push happens. The branch must
    /// already exist; run [`checkout`](Self::checkout) first for new branches.
    /// Failures leave earlier working-tree changes in place.
    pub async fn commit(
        &self,
        branch_name: &str,
        message: &str,
        files: &[FileChange],
    ) -> Result<String> {
        Validator::validate_branch_name(branch_name)?;
        let timer = OperationTimer::new(&format!("commit to {}", branch_name));

        self.vcs.checkout(branch_name).await?;

        self.apply_files(files).await?;

        self.vcs.add(&[".".to_string()]).await?;

        let status = self.vcs.status().await?;

        if status.is_clean() {
            self.logger.warn(&format!(
                "No changes to commit on {} in {}",
                branch_name,
                self.config.repository_dir.display()
            ));
            timer.finish();
            return Ok(String::new());
        }

        let changed = status.changed_paths().len();
        debug!("{} paths staged for commit", changed);

        let summary = self.vcs.commit(message).await?;
        self.vcs.push().await?;

        info!("Pushed {} to {}", summary.commit, branch_name);
        timer.finish_with_count(changed);
        Ok(summary.commit)
    }

    async fn apply_files(&self, files: &[FileChange]) -> Result<()> {
        for change in files {
            match change.action() {
                FileAction::Delete => {
                    self.files.delete(&change.path).await?;
                }
                FileAction::WriteIfMissing => {
                    if self.files.exists(&change.path).await? {
                        debug!("Keeping existing {}", change.path);
                    } else {
                        self.files.write(&change.path, &change.content).await?;
                    }
                }
                FileAction::Write => {
                    self.files.write(&change.path, &change.content).await?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::models::{BranchSummary, CommitSummary, StatusSummary};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeVcs {
        calls: CallLog,
        branches: Vec<String>,
        status: Mutex<Vec<StatusSummary>>,
        fail_fetch: bool,
        fail_checkout: bool,
        fail_add: bool,
        fail_commit: bool,
        fail_push: bool,
    }

    impl FakeVcs {
        fn new(calls: CallLog) -> Self {
            Self {
                calls,
                branches: Vec::new(),
                status: Mutex::new(Vec::new()),
                fail_fetch: false,
                fail_checkout: false,
                fail_add: false,
                fail_commit: false,
                fail_push: false,
            }
        }

        fn with_branches(mut self, branches: &[&str]) -> Self {
            self.branches = branches.iter().map(|b| b.to_string()).collect();
            self
        }

        /// Status results handed out in order, one per `status()` call.
        fn with_status(self, results: Vec<StatusSummary>) -> Self {
            *self.status.lock().unwrap() = results;
            self
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl VcsProvider for FakeVcs {
        async fn fetch(&self) -> Result<()> {
            self.record("fetch".to_string());
            if self.fail_fetch {
                return Err(RepositoryError::Fetch("remote unreachable".to_string()));
            }
            Ok(())
        }

        async fn list_branches(&self) -> Result<BranchSummary> {
            self.record("list_branches".to_string());
            Ok(BranchSummary::new(self.branches.clone()))
        }

        async fn checkout_local_branch(&self, name: &str) -> Result<()> {
            self.record(format!("checkout_local_branch {}", name));
            Ok(())
        }

        async fn checkout(&self, name: &str) -> Result<()> {
            self.record(format!("checkout {}", name));
            if self.fail_checkout {
                return Err(RepositoryError::checkout(
                    name,
                    "pathspec did not match any file(s) known to git",
                ));
            }
            Ok(())
        }

        async fn status(&self) -> Result<StatusSummary> {
            self.record("status".to_string());
            let mut queued = self.status.lock().unwrap();
            if queued.is_empty() {
                Ok(StatusSummary::default())
            } else {
                Ok(queued.remove(0))
            }
        }

        async fn add(&self, paths: &[String]) -> Result<()> {
            self.record(format!("add {}", paths.join(" ")));
            if self.fail_add {
                return Err(RepositoryError::Stage("index.lock exists".to_string()));
            }
            Ok(())
        }

        async fn commit(&self, message: &str) -> Result<CommitSummary> {
            self.record(format!("commit {}", message));
            if self.fail_commit {
                return Err(RepositoryError::Commit("hook rejected commit".to_string()));
            }
            Ok(CommitSummary {
                commit: "abcd1234".to_string(),
            })
        }

        async fn push(&self) -> Result<()> {
            self.record("push".to_string());
            if self.fail_push {
                return Err(RepositoryError::Push("rejected".to_string()));
            }
            Ok(())
        }
    }

    struct FakeFiles {
        calls: CallLog,
        existing: Mutex<HashSet<String>>,
    }

    impl FakeFiles {
        fn new(calls: CallLog, existing: &[&str]) -> Self {
            Self {
                calls,
                existing: Mutex::new(existing.iter().map(|p| p.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl FileWriter for FakeFiles {
        async fn write(&self, path: &str, content: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("write {} {}", path, content));
            self.existing.lock().unwrap().insert(path.to_string());
            Ok(())
        }

        async fn delete(&self, path: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("delete {}", path));
            self.existing.lock().unwrap().remove(path);
            Ok(())
        }

        async fn exists(&self, path: &str) -> Result<bool> {
            self.calls.lock().unwrap().push(format!("exists {}", path));
            Ok(self.existing.lock().unwrap().contains(path))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        warnings: Mutex<Vec<String>>,
    }

    impl DiagnosticLogger for RecordingLogger {
        fn warn(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }

    fn repository_config() -> RepositoryConfig {
        RepositoryConfig {
            origin_url: "https://example.com/acme/generated.git".to_string(),
            repository_dir: PathBuf::from("/tmp/generated"),
        }
    }

    fn client(
        vcs: FakeVcs,
        files: FakeFiles,
    ) -> (RepositoryClient<FakeVcs, FakeFiles>, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        let client = RepositoryClient::new(repository_config(), vcs, files, logger.clone());
        (client, logger)
    }

    fn staged(paths: &[&str]) -> StatusSummary {
        StatusSummary {
            staged: paths.iter().map(|p| p.to_string()).collect(),
            renamed: Vec::new(),
        }
    }

    fn calls(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_checkout_creates_local_branch_when_remote_missing() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()),
            FakeFiles::new(log.clone(), &[]),
        );

        client.checkout("my-branch").await.unwrap();

        assert_eq!(
            calls(&log),
            vec!["fetch", "list_branches", "checkout_local_branch my-branch"]
        );
    }

    #[tokio::test]
    async fn test_checkout_switches_to_existing_remote_branch() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()).with_branches(&["main", "origin/main", "origin/my-branch"]),
            FakeFiles::new(log.clone(), &[]),
        );

        client.checkout("my-branch").await.unwrap();

        assert_eq!(
            calls(&log),
            vec!["fetch", "list_branches", "checkout my-branch"]
        );
    }

    #[tokio::test]
    async fn test_checkout_ignores_local_only_branch() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()).with_branches(&["my-branch", "origin/my-branch-2"]),
            FakeFiles::new(log.clone(), &[]),
        );

        client.checkout("my-branch").await.unwrap();

        assert_eq!(calls(&log).last().unwrap(), "checkout_local_branch my-branch");
    }

    #[tokio::test]
    async fn test_checkout_aborts_on_fetch_failure() {
        let log = CallLog::default();
        let mut vcs = FakeVcs::new(log.clone()).with_branches(&["origin/my-branch"]);
        vcs.fail_fetch = true;
        let (client, _) = client(vcs, FakeFiles::new(log.clone(), &[]));

        let err = client.checkout("my-branch").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Fetch(_)));
        assert_eq!(calls(&log), vec!["fetch"]);
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_branch_name() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()),
            FakeFiles::new(log.clone(), &[]),
        );

        let err = client.checkout("").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Validation(_)));
        assert!(calls(&log).is_empty());
    }

    #[tokio::test]
    async fn test_commit_writes_commits_and_pushes() {
        let log = CallLog::default();
        let (client, logger) = client(
            FakeVcs::new(log.clone()).with_status(vec![staged(&["file1.txt"])]),
            FakeFiles::new(log.clone(), &[]),
        );

        let files = vec![FileChange::write("file1.txt", "File content")];
        let revision = client
            .commit("my-branch", "Add file1", &files)
            .await
            .unwrap();

        assert_eq!(revision, "abcd1234");
        assert_eq!(
            calls(&log),
            vec![
                "checkout my-branch",
                "write file1.txt File content",
                "add .",
                "status",
                "commit Add file1",
                "push",
            ]
        );
        assert!(logger.warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_without_changes_returns_empty_sentinel() {
        let log = CallLog::default();
        let (client, logger) = client(
            FakeVcs::new(log.clone()),
            FakeFiles::new(log.clone(), &[]),
        );

        let revision = client.commit("my-branch", "Nothing", &[]).await.unwrap();

        assert_eq!(revision, "");
        assert_eq!(calls(&log), vec!["checkout my-branch", "add .", "status"]);
        assert_eq!(logger.warnings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_deletes_instead_of_writing() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()).with_status(vec![staged(&["file1.txt"])]),
            FakeFiles::new(log.clone(), &["file1.txt"]),
        );

        let mut change = FileChange::delete("file1.txt");
        change.content = "ignored".to_string();
        let revision = client
            .commit("my-branch", "Remove file1", &[change])
            .await
            .unwrap();

        assert_eq!(revision, "abcd1234");
        let log = calls(&log);
        assert!(log.contains(&"delete file1.txt".to_string()));
        assert!(!log.iter().any(|c| c.starts_with("write")));
    }

    #[tokio::test]
    async fn test_commit_skips_existing_file_when_requested() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()),
            FakeFiles::new(log.clone(), &["config.yml"]),
        );

        let files = vec![
            FileChange::write("config.yml", "overwritten").skip_if_exists(),
            FileChange::write("fresh.yml", "seeded").skip_if_exists(),
        ];
        client.commit("my-branch", "Seed", &files).await.unwrap();

        let log = calls(&log);
        assert!(log.contains(&"exists config.yml".to_string()));
        assert!(!log.iter().any(|c| c.starts_with("write config.yml")));
        assert!(log.contains(&"write fresh.yml seeded".to_string()));
    }

    #[tokio::test]
    async fn test_commit_applies_changes_in_order() {
        let log = CallLog::default();
        let (client, _) = client(
            FakeVcs::new(log.clone()).with_status(vec![staged(&["a.txt"])]),
            FakeFiles::new(log.clone(), &[]),
        );

        let files = vec![
            FileChange::write("a.txt", "first"),
            FileChange::delete("a.txt"),
            FileChange::write("a.txt", "last"),
        ];
        client.commit("my-branch", "Reorder", &files).await.unwrap();

        let applied: Vec<String> = calls(&log)
            .into_iter()
            .filter(|c| c.starts_with("write") || c.starts_with("delete"))
            .collect();
        assert_eq!(
            applied,
            vec!["write a.txt first", "delete a.txt", "write a.txt last"]
        );
    }

    #[tokio::test]
    async fn test_commit_counts_renames_as_changes() {
        let log = CallLog::default();
        let status = StatusSummary {
            staged: Vec::new(),
            renamed: vec!["moved.txt".to_string()],
        };
        let (client, _) = client(
            FakeVcs::new(log.clone()).with_status(vec![status]),
            FakeFiles::new(log.clone(), &[]),
        );

        let revision = client.commit("my-branch", "Move", &[]).await.unwrap();

        assert_eq!(revision, "abcd1234");
        assert!(calls(&log).contains(&"push".to_string()));
    }

    #[tokio::test]
    async fn test_second_identical_commit_is_noop() {
        let log = CallLog::default();
        let (client, logger) = client(
            FakeVcs::new(log.clone())
                .with_status(vec![staged(&["file1.txt"]), StatusSummary::default()]),
            FakeFiles::new(log.clone(), &[]),
        );

        let files = vec![FileChange::write("file1.txt", "File content")];
        let first = client.commit("my-branch", "Add", &files).await.unwrap();
        let second = client.commit("my-branch", "Add", &files).await.unwrap();

        assert_eq!(first, "abcd1234");
        assert_eq!(second, "");
        let log = calls(&log);
        assert_eq!(log.iter().filter(|c| c.as_str() == "push").count(), 1);
        assert_eq!(logger.warnings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_push_failure_propagates() {
        let log = CallLog::default();
        let mut vcs = FakeVcs::new(log.clone()).with_status(vec![staged(&["file1.txt"])]);
        vcs.fail_push = true;
        let (client, _) = client(vcs, FakeFiles::new(log.clone(), &[]));

        let err = client
            .commit("my-branch", "Add", &[FileChange::write("file1.txt", "x")])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Push(_)));
    }

    #[tokio::test]
    async fn test_commit_on_unknown_branch_stops_before_files() {
        let log = CallLog::default();
        let mut vcs = FakeVcs::new(log.clone()).with_status(vec![staged(&["b.txt"])]);
        vcs.fail_checkout = true;
        let (client, logger) = client(vcs, FakeFiles::new(log.clone(), &["old.txt"]));

        let files = vec![
            FileChange::write("b.txt", "generated"),
            FileChange::delete("old.txt"),
        ];
        let err = client.commit("nope", "Add b", &files).await.unwrap_err();

        match err {
            RepositoryError::Checkout { branch, .. } => assert_eq!(branch, "nope"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls(&log), vec!["checkout nope"]);
        assert!(logger.warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stage_failure_skips_status_commit_and_push() {
        let log = CallLog::default();
        let mut vcs = FakeVcs::new(log.clone()).with_status(vec![staged(&["file1.txt"])]);
        vcs.fail_add = true;
        let (client, _) = client(vcs, FakeFiles::new(log.clone(), &[]));

        let err = client
            .commit("my-branch", "Add", &[FileChange::write("file1.txt", "x")])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Stage(_)));
        assert_eq!(
            calls(&log),
            vec!["checkout my-branch", "write file1.txt x", "add ."]
        );
    }

    #[tokio::test]
    async fn test_commit_failure_never_pushes() {
        let log = CallLog::default();
        let mut vcs = FakeVcs::new(log.clone()).with_status(vec![staged(&["file1.txt"])]);
        vcs.fail_commit = true;
        let (client, _) = client(vcs, FakeFiles::new(log.clone(), &[]));

        let err = client
            .commit("my-branch", "Add", &[FileChange::write("file1.txt", "x")])
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Commit(_)));
        let log = calls(&log);
        assert_eq!(log.last().unwrap(), "commit Add");
        assert!(!log.contains(&"push".to_string()));
    }
}
