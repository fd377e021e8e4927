// file: src/repository/mod.rs
// description: Repository operations module exports
// reference: Internal module structure

pub mod client;
pub mod file_writer;
pub mod git_cli;
pub mod provider;

pub use client::RepositoryClient;
pub use file_writer::WorkdirFileWriter;
pub use git_cli::GitCliProvider;
pub use provider::{FileWriter, VcsProvider};
