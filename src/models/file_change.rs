// file: src/models/file_change.rs
// description: a single generated file write or deletion
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// One entry of a generated change set.
///
/// When `deleted` is set the content is ignored. `skip_if_exists` and
/// `deleted` are not meant to be combined; if they are, deletion wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, alias = "skipIfExists")]
    pub skip_if_exists: bool,
}

/// What applying a [`FileChange`] does to the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Delete,
    WriteIfMissing,
    Write,
}

impl FileChange {
    pub fn write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            deleted: false,
            skip_if_exists: false,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: String::new(),
            deleted: true,
            skip_if_exists: false,
        }
    }

    pub fn skip_if_exists(mut self) -> Self {
        self.skip_if_exists = true;
        self
    }

    pub fn action(&self) -> FileAction {
        if self.deleted {
            FileAction::Delete
        } else if self.skip_if_exists {
            FileAction::WriteIfMissing
        } else {
            FileAction::Write
        }
    }
}
