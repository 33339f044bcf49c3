//! Default values for kata configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Worker threads in the shared pool, matching the fan-out of a typical
/// template tree.
pub const DEFAULT_WORKER_THREADS: usize = 100;

/// Upper bound accepted for `worker_threads`.
pub const MAX_WORKER_THREADS: usize = 1024;

/// Base URL of the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com/";

/// Environment variable holding an optional GitHub token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// HTTP request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory the `download` command writes into when `--output` is omitted.
pub const DEFAULT_OUTPUT_DIR: &str = "sandbox";

/// Returns the default configuration file path.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/kata/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/kata/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\kata\config.yaml`
///
/// Falls back to `.kata/config.yaml` in the current directory if the
/// platform config directory cannot be determined.
///
/// This can be overridden by the `--config` CLI flag or the `KATA_CONFIG`
/// environment variable.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("kata"))
        .unwrap_or_else(|| PathBuf::from(".kata"))
        .join("config.yaml")
}
