// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use config::{Config, GitConfig, RepositoryConfig};
pub use error::{RepositoryError, Result};
pub use models::{BranchSummary, CommitSummary, FileAction, FileChange, StatusSummary};
pub use repository::{
    FileWriter, GitCliProvider, RepositoryClient, VcsProvider, WorkdirFileWriter,
};
pub use utils::{DiagnosticLogger, OperationTimer, TracingLogger, Validator};
