//! Recursive discovery of every file below a remote directory
//!
//! The explorer lists one directory at a time through the content provider:
//!
//! 1.  **List**: one `list_contents` call for the directory being explored.
//!
//! 2.  **Partition**: file entries become `DownloadableFile`s on the spot;
//!     directory entries are explored recursively at `{path}/{name}`.
//!     Symlinks and submodules are skipped with a warning.
//!
//! 3.  **Fan Out**: sibling sub-directories are explored concurrently on the
//!     shared `WorkerPool`. A directory waits for all of its own children and
//!     returns its files followed by theirs.
//!
//! The flat result is therefore in no canonical order. The first failure in
//! any branch is returned to the caller; siblings already in flight may run
//! to completion, but their results are dropped.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::path::{join_remote_path, RelativePath};
use crate::pool::WorkerPool;
use crate::provider::{ContentProvider, EntryType, RemoteEntry};

/// A remote file ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownloadableFile {
    /// Where the file lands below the download root.
    pub relative_path: RelativePath,
    /// Opaque token the provider resolves to the file's raw text.
    pub download_locator: String,
}

impl DownloadableFile {
    pub fn new(relative_path: RelativePath, download_locator: impl Into<String>) -> Self {
        Self {
            relative_path,
            download_locator: download_locator.into(),
        }
    }

    /// Convert a file entry from the listing of `listed_path`.
    fn from_entry(entry: RemoteEntry, listed_path: &str) -> Result<Self> {
        let download_locator = entry.download_locator.ok_or_else(|| {
            Error::traversal(
                listed_path,
                format!("file entry '{}' has no download locator", entry.path),
            )
        })?;

        let relative_path = RelativePath::parse(&entry.path)
            .map_err(|e| Error::traversal(listed_path, e.to_string()))?;

        Ok(Self {
            relative_path,
            download_locator,
        })
    }
}

/// Walks a remote directory tree and flattens it into a file list.
pub struct TreeExplorer {
    provider: Arc<dyn ContentProvider>,
    pool: Arc<WorkerPool>,
}

impl TreeExplorer {
    pub fn new(provider: Arc<dyn ContentProvider>, pool: Arc<WorkerPool>) -> Self {
        Self { provider, pool }
    }

    /// Every file below `root_path` in `owner/repo_name`, at any depth.
    ///
    /// `root_path` may be `""` for the repository root; leading and trailing
    /// separators are ignored. Relative paths in the result are the paths the
    /// provider reports, rooted at the repository.
    pub fn explore(
        &self,
        owner: &str,
        repo_name: &str,
        root_path: &str,
    ) -> Result<Vec<DownloadableFile>> {
        let root_path = root_path.trim_matches('/');
        debug!(
            "Exploring {}/{} from '{}' on {} workers",
            owner,
            repo_name,
            root_path,
            self.pool.capacity()
        );

        let files = self
            .pool
            .install(|| self.files_in_dir(owner, repo_name, root_path))?;

        ensure_unique_paths(&files, root_path)?;

        info!(
            "Found {} file(s) under {}/{}:{}",
            files.len(),
            owner,
            repo_name,
            root_path
        );
        Ok(files)
    }

    fn files_in_dir(
        &self,
        owner: &str,
        repo_name: &str,
        dir_path: &str,
    ) -> Result<Vec<DownloadableFile>> {
        let entries = self.provider.list_contents(owner, repo_name, dir_path)?;
        debug!("Listed '{}': {} entries", dir_path, entries.len());

        let mut files = Vec::new();
        let mut sub_dirs = Vec::new();

        for entry in entries {
            match entry.entry_type {
                EntryType::File => files.push(DownloadableFile::from_entry(entry, dir_path)?),
                EntryType::Directory => sub_dirs.push(join_remote_path(dir_path, &entry.name)),
                EntryType::Symlink | EntryType::Submodule => {
                    warn!(
                        "Skipping '{}': {:?} entries are not downloaded",
                        entry.path, entry.entry_type
                    );
                }
            }
        }

        let sub_dir_files: Vec<Vec<DownloadableFile>> = sub_dirs
            .par_iter()
            .map(|sub_dir| self.files_in_dir(owner, repo_name, sub_dir))
            .collect::<Result<_>>()?;

        files.extend(sub_dir_files.into_iter().flatten());
        Ok(files)
    }
}

/// A tree walk never reaches the same file twice; a provider that claims
/// otherwise is returning inconsistent listings.
fn ensure_unique_paths(files: &[DownloadableFile], root_path: &str) -> Result<()> {
    let mut seen = HashSet::with_capacity(files.len());
    for file in files {
        if !seen.insert(&file.relative_path) {
            return Err(Error::traversal(
                root_path,
                format!("'{}' was listed more than once", file.relative_path),
            ));
        }
    }
    Ok(())
}
