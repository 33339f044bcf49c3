//! # Error Handling
//!
//! This module defines the centralized error type for the `kata` crate. It
//! uses the `thiserror` library to build a single `Error` enum whose variants
//! map onto the failure modes of the two core operations (walking a remote
//! template tree and downloading it) plus the surrounding configuration and
//! filesystem plumbing.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. The variants that callers of the core are
//!   expected to branch on are:
//!   - `Provider`: the content provider rejected a request. The
//!     `ProviderErrorKind` tells a throttled request (`RateLimited`) apart
//!     from a missing or forbidden resource and from transport failures.
//!   - `Traversal`: a listing response was structurally invalid.
//!   - `InvalidTarget`: the local destination is missing or not a directory.
//!   - `Download`: one file's fetch-then-write step failed. It carries the
//!     offending relative path and the underlying cause.
//!   - `InvalidKataName`, `LanguageNotFound`, `TemplateNotFound` and
//!     `TemplateNotSpecified`: `kata init` was asked for something the
//!     template repository cannot provide. The last three list what it can.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! No variant is ever swallowed inside the crate: retry and reporting
//! decisions belong to whoever called `explore` or `download_all`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::path::RelativePath;

/// The reason a content provider refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The owner, repository, path, or download locator does not exist.
    NotFound,
    /// The request was refused for lack of permission.
    Forbidden,
    /// The provider's request quota is exhausted.
    RateLimited,
    /// The request never produced a usable answer (network, TLS, 5xx, ...).
    Transport,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderErrorKind::NotFound => "not found",
            ProviderErrorKind::Forbidden => "forbidden",
            ProviderErrorKind::RateLimited => "rate limit exhausted",
            ProviderErrorKind::Transport => "transport failure",
        };
        f.write_str(label)
    }
}

/// Main error type for kata operations
#[derive(Error, Debug)]
pub enum Error {
    /// The content provider rejected a listing or fetch request.
    ///
    /// `target` is the coordinate or locator that was requested.
    #[error("Content provider error ({kind}) for {target}: {message}")]
    Provider {
        kind: ProviderErrorKind,
        target: String,
        message: String,
    },

    /// A listing response was structurally invalid, for example a file entry
    /// without a download locator.
    #[error("Malformed listing for '{path}': {message}")]
    Traversal { path: String, message: String },

    /// The local destination directory does not exist or is not a directory.
    #[error("Invalid target directory '{}': {message}", path.display())]
    InvalidTarget { path: PathBuf, message: String },

    /// Fetching or writing one specific file failed.
    #[error("Failed to download '{path}': {source}")]
    Download {
        path: RelativePath,
        source: Box<Error>,
    },

    /// A kata name that cannot be used as a directory name.
    #[error("Invalid kata name '{name}': {message}")]
    InvalidKataName { name: String, message: String },

    /// The template repository has no directory for the requested language.
    #[error("Language '{language}' not found. Available languages: {}", list(available))]
    LanguageNotFound {
        language: String,
        available: Vec<String>,
    },

    /// The language exists but has no template of the requested name.
    #[error("Template '{template}' not found for '{language}'. Available templates: {}", list(available))]
    TemplateNotFound {
        language: String,
        template: String,
        available: Vec<String>,
    },

    /// No template was named and the language does not have exactly one.
    #[error("No template named for '{language}'. Available templates: {}", list(available))]
    TemplateNotSpecified {
        language: String,
        available: Vec<String>,
    },

    /// A relative path was rejected.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An error occurred while writing to the local filesystem.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// The configuration is missing or invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The worker pool could not be built.
    #[error("Worker pool error: {message}")]
    Pool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Builds a provider error.
    pub fn provider(
        kind: ProviderErrorKind,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Provider {
            kind,
            target: target.into(),
            message: message.into(),
        }
    }

    /// Builds a traversal error for the listing of `path`.
    pub fn traversal(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Traversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The provider error kind, looking through `Download` wrappers.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Error::Provider { kind, .. } => Some(*kind),
            Error::Download { source, .. } => source.provider_kind(),
            _ => None,
        }
    }

    /// True when the provider signalled that its request quota is exhausted.
    pub fn is_rate_limited(&self) -> bool {
        self.provider_kind() == Some(ProviderErrorKind::RateLimited)
    }
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
