//! Writing downloaded files to the local filesystem
//!
//! `FileWriter` is the capability the downloader persists content through.
//! `DiskWriter` is the real implementation:
//!
//! 1.  **Create Directories**: creates any missing parent directories of
//!     `root_dir / relative_path`.
//!
//! 2.  **Stage Content**: writes the content to a temporary file inside the
//!     destination directory.
//!
//! 3.  **Publish**: renames the temporary file over the target. The rename is
//!     atomic on the same filesystem, so a reader sees either the previous
//!     file or the complete new one.
//!
//! 4.  **Set Permissions**: on Unix-like systems the file ends up `0o644`,
//!     instead of the owner-only mode of the staging file.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::path::RelativePath;

/// Mode given to written files on Unix-like systems.
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Persists text content below a root directory.
pub trait FileWriter: Send + Sync {
    /// Create any missing parent directories and create or overwrite
    /// `root_dir / relative_path` with exactly `content`.
    fn write_file(&self, root_dir: &Path, relative_path: &RelativePath, content: &str) -> Result<()>;
}

/// Writes files to the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskWriter;

impl DiskWriter {
    pub fn new() -> Self {
        Self
    }
}

impl FileWriter for DiskWriter {
    fn write_file(&self, root_dir: &Path, relative_path: &RelativePath, content: &str) -> Result<()> {
        let full_path = root_dir.join(relative_path.to_path_buf());
        // RelativePath always has at least one segment, so there is a parent
        let parent = full_path.parent().unwrap_or(root_dir);

        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;

        let mut staged = NamedTempFile::new_in(parent).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to create temporary file in '{}': {}",
                parent.display(),
                e
            ),
        })?;

        staged
            .write_all(content.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| Error::Filesystem {
                message: format!("Failed to write file '{}': {}", full_path.display(), e),
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(FILE_MODE);
            staged
                .as_file()
                .set_permissions(perms)
                .map_err(|e| Error::Filesystem {
                    message: format!(
                        "Failed to set permissions on '{}': {}",
                        full_path.display(),
                        e
                    ),
                })?;
        }

        staged.persist(&full_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", full_path.display(), e.error),
        })?;

        Ok(())
    }
}
