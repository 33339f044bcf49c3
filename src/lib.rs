//! # Kata Template Library
//!
//! This library pulls a kata template (a directory tree of starter files) out
//! of a GitHub repository and onto the local disk. It is used by the `kata`
//! command-line tool but works with any [`provider::ContentProvider`], which
//! makes it usable against other hosts or against an in-memory fake.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use kata::explorer::TreeExplorer;
//! use kata::pool::WorkerPool;
//! use kata::provider::{MemoryProvider, RemoteEntry};
//!
//! let provider = MemoryProvider::new()
//!     .with_listing("octocat", "katas", "", vec![
//!         RemoteEntry::file("README.md", "https://example.com/README.md"),
//!         RemoteEntry::directory("src"),
//!     ])
//!     .with_listing("octocat", "katas", "src", vec![
//!         RemoteEntry::file("src/lib.rs", "https://example.com/src/lib.rs"),
//!     ]);
//!
//! let pool = Arc::new(WorkerPool::new(4).unwrap());
//! let explorer = TreeExplorer::new(Arc::new(provider), pool);
//! let files = explorer.explore("octocat", "katas", "").unwrap();
//! assert_eq!(files.len(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Exploring (`explorer`)**: `TreeExplorer` walks a remote directory tree,
//!   listing sibling directories concurrently, and flattens it into
//!   `DownloadableFile` values.
//! - **Downloading (`downloader`)**: `BulkDownloader` fetches every file and
//!   writes it below a local root, one independent unit of work per file.
//! - **Capabilities (`provider`, `filesystem`)**: the remote side is a
//!   `ContentProvider` (`github::GithubApi` in production) and the local side
//!   a `FileWriter` (`filesystem::DiskWriter`).
//! - **Templates (`template`)**: `TemplateCatalog` lists the languages and
//!   templates of a template repository, and `InitKataService` bootstraps a
//!   new kata directory from one of them.
//! - **Worker Pool (`pool`)**: one bounded pool runs every listing, fetch, and
//!   write call for both phases.
//!
//! Errors from any of these surface through [`error::Error`] unchanged;
//! nothing is retried or swallowed inside the library.

pub mod config;
pub mod defaults;
pub mod downloader;
pub mod error;
pub mod explorer;
pub mod filesystem;
pub mod github;
pub mod path;
pub mod pool;
pub mod provider;
pub mod template;

#[cfg(test)]
mod explorer_proptest;
#[cfg(test)]
mod path_proptest;
