// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod file_change;
pub mod vcs;

pub use file_change::{FileAction, FileChange};
pub use vcs::{BranchSummary, CommitSummary, StatusSummary};
