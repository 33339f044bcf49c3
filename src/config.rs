//! # Configuration File
//!
//! This module defines the optional YAML file that tunes how `kata` talks to
//! GitHub and how much work it runs at once. Every key may be omitted:
//!
//! ```yaml
//! worker_threads: 100
//! github:
//!   api_url: https://api.github.com/
//!   token_env: GITHUB_TOKEN
//!   timeout_secs: 30
//!   template_repo:            # only needed by `kata init`
//!     owner: my-org
//!     repo: kata-templates
//!     template_at_root:       # optional per-language override
//!       python: true
//! ```
//!
//! ## Loading
//!
//! [`Config::load`] reads the file named on the command line when there is
//! one, and fails if it is missing. Without an explicit path it falls back to
//! [`default_config_path`], and a missing default file just yields the
//! built-in defaults.
//!
//! ## Validation
//!
//! [`Config::validate`] checks value ranges once, up front, so that a bad
//! setting is reported as an `Error::Config` with a hint instead of surfacing
//! later as a confusing pool or HTTP failure.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{
    default_config_path, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENV,
    DEFAULT_WORKER_THREADS, MAX_WORKER_THREADS,
};
use crate::error::{Error, Result};
use crate::github::GithubSettings;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size of the worker pool shared by exploring and downloading.
    pub worker_threads: usize,
    pub github: GithubConfig,
}

/// The `github:` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Base URL of the REST API. GitHub Enterprise uses `https://HOST/api/v3/`.
    pub api_url: String,
    /// Name of the environment variable holding an optional access token.
    pub token_env: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// The repository `kata init` takes its templates from.
    pub template_repo: Option<TemplateRepoConfig>,
}

/// The `github.template_repo:` section.
///
/// The repository holds one top-level directory per language. A language
/// directory is either a template itself or holds one directory per template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateRepoConfig {
    pub owner: String,
    pub repo: String,
    /// Per language, whether the language directory is itself the template.
    /// Languages left out are detected by a `README.md` at their root.
    #[serde(default)]
    pub template_at_root: BTreeMap<String, bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_threads: DEFAULT_WORKER_THREADS,
            github: GithubConfig::default(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            template_repo: None,
        }
    }
}

impl Config {
    /// Parse a YAML document.
    ///
    /// An empty document is the default configuration.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read '{}': {}", path.display(), e),
            hint: None,
        })?;
        Self::parse(&content).map_err(|e| Error::Config {
            message: format!("Failed to parse '{}': {}", path.display(), e),
            hint: Some("Check the file against the documented keys: worker_threads, github.api_url, github.token_env, github.timeout_secs, github.template_repo".to_string()),
        })
    }

    /// Load the configuration, preferring an explicitly named file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config {
                        message: format!("Configuration file '{}' not found", path.display()),
                        hint: Some("Remove --config (or KATA_CONFIG) to use the defaults".to_string()),
                    });
                }
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => {
                let path = default_config_path();
                if path.exists() {
                    debug!("Loading configuration from {}", path.display());
                    Self::from_file(&path)
                } else {
                    debug!("No configuration at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 || self.worker_threads > MAX_WORKER_THREADS {
            return Err(Error::Config {
                message: format!(
                    "worker_threads must be between 1 and {}, got {}",
                    MAX_WORKER_THREADS, self.worker_threads
                ),
                hint: Some(format!("The default is {}", DEFAULT_WORKER_THREADS)),
            });
        }

        self.github.api_url()?;

        if self.github.timeout_secs == 0 {
            return Err(Error::Config {
                message: "github.timeout_secs must be greater than 0".to_string(),
                hint: Some(format!("The default is {}", DEFAULT_TIMEOUT_SECS)),
            });
        }

        if self.github.token_env.trim().is_empty() {
            return Err(Error::Config {
                message: "github.token_env must name an environment variable".to_string(),
                hint: Some(format!("The default is {}", DEFAULT_TOKEN_ENV)),
            });
        }

        if let Some(template_repo) = &self.github.template_repo {
            if template_repo.owner.trim().is_empty() || template_repo.repo.trim().is_empty() {
                return Err(Error::Config {
                    message: "github.template_repo needs both an owner and a repo".to_string(),
                    hint: Some(TEMPLATE_REPO_HINT.to_string()),
                });
            }
        }

        Ok(())
    }
}

const TEMPLATE_REPO_HINT: &str =
    "Add 'github: {template_repo: {owner: <OWNER>, repo: <REPO>}}' to the configuration file";

impl GithubConfig {
    /// The template repository, which only `kata init` requires.
    pub fn template_repo(&self) -> Result<&TemplateRepoConfig> {
        self.template_repo.as_ref().ok_or_else(|| Error::Config {
            message: "github.template_repo is not configured".to_string(),
            hint: Some(TEMPLATE_REPO_HINT.to_string()),
        })
    }

    /// The API base URL, normalised to end in `/`.
    pub fn api_url(&self) -> Result<Url> {
        let invalid = |reason: String| Error::Config {
            message: format!("github.api_url '{}' is invalid: {}", self.api_url, reason),
            hint: Some(format!("Use an absolute http(s) URL such as {}", DEFAULT_API_URL)),
        };

        let mut url = Url::parse(&self.api_url).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Resolve the settings for [`crate::github::GithubApi`], reading the
    /// token from the environment.
    pub fn settings(&self) -> Result<GithubSettings> {
        let token = std::env::var(&self.token_env)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Ok(GithubSettings {
            api_url: self.api_url()?,
            token,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
