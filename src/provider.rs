//! # Repository Content Providers
//!
//! This module defines `ContentProvider`, the capability through which the
//! rest of the crate reads a remote repository. It has exactly two
//! operations: list the immediate children of a directory, and fetch the raw
//! text behind a download locator.
//!
//! ## Design
//!
//! `TreeExplorer` and `BulkDownloader` only ever see a
//! `dyn ContentProvider`, never a concrete transport:
//!
//! - **`GithubApi`** (in [`crate::github`]) talks to the GitHub contents API
//!   and is what the binary uses.
//!
//! - **`MemoryProvider`** serves a fake repository held in memory. It counts
//!   the calls made against it and can be told to fail for specific paths,
//!   which makes it the provider every test in this crate is written against.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, ProviderErrorKind, Result};

/// What kind of object a listing entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
    /// Symbolic link. Not followed.
    Symlink,
    /// Git submodule. Not followed.
    Submodule,
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Leaf name.
    pub name: String,
    /// Full path from the repository root.
    pub path: String,
    pub entry_type: EntryType,
    /// Present for files only.
    pub download_locator: Option<String>,
}

impl RemoteEntry {
    /// A file entry; the name is the last segment of `path`.
    pub fn file(path: &str, download_locator: &str) -> Self {
        Self {
            name: leaf_name(path),
            path: path.to_string(),
            entry_type: EntryType::File,
            download_locator: Some(download_locator.to_string()),
        }
    }

    /// A directory entry; the name is the last segment of `path`.
    pub fn directory(path: &str) -> Self {
        Self {
            name: leaf_name(path),
            path: path.to_string(),
            entry_type: EntryType::Directory,
            download_locator: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_directory(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

fn leaf_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Read access to a remote repository.
///
/// Implementations must be shareable across the worker pool: every call may
/// come from a different thread.
pub trait ContentProvider: Send + Sync {
    /// Lists the immediate children of `path` in `owner/repo`.
    ///
    /// The empty string designates the repository root.
    fn list_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Returns the full text behind a download locator.
    fn fetch_raw_content(&self, download_locator: &str) -> Result<String>;
}

type ListingKey = (String, String, String);

/// An in-memory repository.
///
/// Listings are keyed by `(owner, repo, path)`. Unknown listings and unknown
/// locators answer with a `NotFound` provider error, like a real remote.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    listings: HashMap<ListingKey, Vec<RemoteEntry>>,
    contents: HashMap<String, String>,
    listing_failures: HashMap<ListingKey, ProviderErrorKind>,
    fetch_failures: HashMap<String, ProviderErrorKind>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryProvider {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listing of a directory.
    pub fn with_listing(
        mut self,
        owner: &str,
        repo: &str,
        path: &str,
        entries: Vec<RemoteEntry>,
    ) -> Self {
        self.listings.insert(key(owner, repo, path), entries);
        self
    }

    /// Register the text served for a download locator.
    pub fn with_content(mut self, download_locator: &str, text: &str) -> Self {
        self.contents
            .insert(download_locator.to_string(), text.to_string());
        self
    }

    /// Make listing `path` fail with `kind`.
    pub fn with_listing_failure(
        mut self,
        owner: &str,
        repo: &str,
        path: &str,
        kind: ProviderErrorKind,
    ) -> Self {
        self.listing_failures.insert(key(owner, repo, path), kind);
        self
    }

    /// Make fetching `download_locator` fail with `kind`.
    pub fn with_fetch_failure(mut self, download_locator: &str, kind: ProviderErrorKind) -> Self {
        self.fetch_failures
            .insert(download_locator.to_string(), kind);
        self
    }

    /// Number of `list_contents` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch_raw_content` calls served so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Total number of calls of either kind.
    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.fetch_calls()
    }
}

fn key(owner: &str, repo: &str, path: &str) -> ListingKey {
    (owner.to_string(), repo.to_string(), path.to_string())
}

impl ContentProvider for MemoryProvider {
    fn list_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<RemoteEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let key = key(owner, repo, path);
        let target = format!("{}/{}:{}", owner, repo, path);

        if let Some(kind) = self.listing_failures.get(&key) {
            return Err(Error::provider(*kind, target, "injected listing failure"));
        }

        self.listings.get(&key).cloned().ok_or_else(|| {
            Error::provider(ProviderErrorKind::NotFound, target, "no such directory")
        })
    }

    fn fetch_raw_content(&self, download_locator: &str) -> Result<String> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(kind) = self.fetch_failures.get(download_locator) {
            return Err(Error::provider(
                *kind,
                download_locator,
                "injected fetch failure",
            ));
        }

        self.contents.get(download_locator).cloned().ok_or_else(|| {
            Error::provider(ProviderErrorKind::NotFound, download_locator, "no such file")
        })
    }
}
