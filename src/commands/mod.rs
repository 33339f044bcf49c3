//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `kata`
//! command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap`.
//! - An `execute` function that takes the parsed `Args` plus the global
//!   options and calls into the `kata` library.
//!
//! The wiring every command shares (configuration, worker pool, GitHub client)
//! lives in [`Session`].

pub mod download;
pub mod init;
pub mod ls;

use std::sync::Arc;

use anyhow::Result;

use kata::config::Config;
use kata::downloader::BulkDownloader;
use kata::error::Error;
use kata::explorer::TreeExplorer;
use kata::filesystem::DiskWriter;
use kata::github::GithubApi;
use kata::pool::WorkerPool;
use kata::provider::ContentProvider;

use crate::cli::GlobalArgs;

/// Load the configuration file and apply command-line overrides.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(global.config.as_deref())?;
    if let Some(threads) = global.threads {
        config.worker_threads = threads;
    }
    config.validate()?;
    Ok(config)
}

/// A connected GitHub client and the worker pool both phases run on.
pub struct Session {
    provider: Arc<dyn ContentProvider>,
    pool: Arc<WorkerPool>,
}

impl Session {
    pub fn connect(config: &Config) -> Result<Self> {
        let pool = WorkerPool::new(config.worker_threads)?;
        let settings = config.github.settings()?;
        if settings.token.is_none() {
            log::info!(
                "{} is not set, using unauthenticated GitHub requests",
                config.github.token_env
            );
        }
        let github = GithubApi::new(settings)?;

        Ok(Self {
            provider: Arc::new(github),
            pool: Arc::new(pool),
        })
    }

    pub fn provider(&self) -> Arc<dyn ContentProvider> {
        self.provider.clone()
    }

    pub fn explorer(&self) -> TreeExplorer {
        TreeExplorer::new(self.provider.clone(), self.pool.clone())
    }

    pub fn downloader(&self) -> BulkDownloader {
        BulkDownloader::new(
            self.provider.clone(),
            Arc::new(DiskWriter::new()),
            self.pool.clone(),
        )
    }
}

/// Normalise a user-supplied template path: `/java/` and `java` name the same
/// directory, and an empty path is the repository root.
pub fn template_path(path: Option<&str>) -> String {
    path.unwrap_or_default().trim_matches('/').to_string()
}

/// Attach a remedy to errors the user can act on.
pub fn explain(error: Error, token_env: &str) -> anyhow::Error {
    if error.is_rate_limited() {
        return anyhow::anyhow!(
            "{}\n  hint: GitHub's rate limit is exhausted; wait for it to reset or export {} with a personal access token",
            error,
            token_env
        );
    }
    anyhow::Error::new(error)
}
