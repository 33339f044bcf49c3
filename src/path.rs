//! Path handling for remote template trees

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A slash-segmented path relative to the root of a walk.
///
/// Never absolute and never escapes its root: empty segments, `.` and `..`
/// are rejected at construction, so joining it onto a local directory always
/// lands inside that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    /// Parse a `/`-separated path as returned by a content provider.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::Path {
                message: "relative path is empty".to_string(),
            });
        }
        if raw.starts_with('/') {
            return Err(Error::Path {
                message: format!("'{}' is absolute", raw),
            });
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" => {
                    return Err(Error::Path {
                        message: format!("'{}' contains an empty segment", raw),
                    })
                }
                "." | ".." => {
                    return Err(Error::Path {
                        message: format!("'{}' contains a '{}' segment", raw, segment),
                    })
                }
                s if s.contains('\\') || s.contains('\0') => {
                    return Err(Error::Path {
                        message: format!("'{}' contains a forbidden character", raw),
                    })
                }
                s => segments.push(s.to_string()),
            }
        }

        Ok(Self { segments })
    }

    /// The individual path segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment.
    pub fn file_name(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The path below `prefix`, or `None` when this path is not strictly
    /// inside it.
    pub fn strip_prefix(&self, prefix: &RelativePath) -> Option<RelativePath> {
        if self.segments.len() <= prefix.segments.len()
            || !self.segments.starts_with(&prefix.segments)
        {
            return None;
        }
        Some(Self {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }

    /// Convert to a native relative path.
    pub fn to_path_buf(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for RelativePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Join a child name onto a remote directory path.
///
/// The repository root is the empty string, so leading separators are
/// dropped: `join_remote_path("", "src") == "src"`. Trailing separators on
/// `dir` are dropped too: `join_remote_path("java/", "src") == "java/src"`.
pub fn join_remote_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
        .trim_start_matches('/')
        .to_string()
}
