// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{RepositoryError, Result};
use crate::utils::validation::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub git: GitConfig,
}

/// Identifies the remote and the local working tree a client is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryConfig {
    pub origin_url: String,
    pub repository_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default = "default_clone_if_missing")]
    pub clone_if_missing: bool,
}

fn default_binary() -> String {
    "git".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_clone_if_missing() -> bool {
    true
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            remote: default_remote(),
            author_name: None,
            author_email: None,
            clone_if_missing: default_clone_if_missing(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GIT_AUTOCOMMIT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            repository: RepositoryConfig {
                origin_url: "https://github.com/user/example-repo.git".to_string(),
                repository_dir: PathBuf::from("./workdir"),
            },
            git: GitConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_origin_url(&self.repository.origin_url)
            .map_err(|e| RepositoryError::Config(e.to_string()))?;

        if self.repository.repository_dir.as_os_str().is_empty() {
            return Err(RepositoryError::Config(
                "repository_dir must not be empty".to_string(),
            ));
        }

        if self.git.binary.trim().is_empty() {
            return Err(RepositoryError::Config(
                "git.binary must not be empty".to_string(),
            ));
        }

        if self.git.remote.trim().is_empty() {
            return Err(RepositoryError::Config(
                "git.remote must not be empty".to_string(),
            ));
        }

        if self.git.author_name.is_some() != self.git.author_email.is_some() {
            return Err(RepositoryError::Config(
                "git.author_name and git.author_email must be set together".to_string(),
            ));
        }

        Ok(())
    }
}
