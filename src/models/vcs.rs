// file: src/models/vcs.rs
// description: results reported by version-control operations
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Branch names known after a fetch, local and remote-qualified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub all: Vec<String>,
}

impl BranchSummary {
    pub fn new(all: Vec<String>) -> Self {
        Self { all }
    }

    /// True when `<remote>/<name>` is among the listed branches.
    pub fn contains_remote(&self, remote: &str, name: &str) -> bool {
        let qualified = format!("{}/{}", remote, name);
        self.all.iter().any(|branch| *branch == qualified)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub staged: Vec<String>,
    pub renamed: Vec<String>,
}

impl StatusSummary {
    /// Union of staged and renamed paths, de-duplicated and sorted.
    pub fn changed_paths(&self) -> BTreeSet<&str> {
        self.staged
            .iter()
            .chain(self.renamed.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.renamed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub commit: String,
}
