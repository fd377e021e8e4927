// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{RepositoryError, Result};
use std::path::{Component, Path};

pub struct Validator;

impl Validator {
    pub fn validate_not_empty(value: &str, what: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(RepositoryError::Validation(format!("{} is empty", what)));
        }
        Ok(())
    }

    /// Subset of `git check-ref-format` rules that matter for generated branch names.
    pub fn validate_branch_name(name: &str) -> Result<()> {
        Self::validate_not_empty(name, "Branch name")?;

        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(RepositoryError::Validation(format!(
                "Branch name contains whitespace: {:?}",
                name
            )));
        }

        if name.starts_with('-') {
            return Err(RepositoryError::Validation(format!(
                "Branch name cannot start with '-': {}",
                name
            )));
        }

        if name.contains("..") || name.ends_with('/') || name.ends_with(".lock") {
            return Err(RepositoryError::Validation(format!(
                "Invalid branch name: {}",
                name
            )));
        }

        Ok(())
    }

    pub fn validate_relative_path(path: &str) -> Result<()> {
        Self::validate_not_empty(path, "File path")?;

        let candidate = Path::new(path);
        for component in candidate.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(RepositoryError::Validation(format!(
                        "Path escapes the working tree: {}",
                        path
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(RepositoryError::Validation(format!(
                        "Path must be relative to the working tree: {}",
                        path
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn validate_origin_url(url: &str) -> Result<()> {
        Self::validate_not_empty(url, "Origin URL")?;

        if url.chars().any(char::is_whitespace) {
            return Err(RepositoryError::Validation(format!(
                "Origin URL contains whitespace: {:?}",
                url
            )));
        }

        Ok(())
    }
}
