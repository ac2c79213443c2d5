//! Core record types exchanged with the repository source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Git mode string for tree entries that are directories.
pub const DIR_MODE: &str = "040000";

/// Kind of a flat repository entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    File,
    Dir,
}

impl EntryMode {
    /// Map a git mode string (`"100644"`, `"040000"`, ...) to an entry kind.
    ///
    /// Only `040000` is a directory; symlinks and submodules count as files.
    pub fn from_git_mode(mode: &str) -> Self {
        if mode == DIR_MODE {
            EntryMode::Dir
        } else {
            EntryMode::File
        }
    }
}

/// One entry of the flat, recursive repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    /// `/`-separated path from the repository root
    pub path: String,
    pub mode: EntryMode,
    pub sha: String,
    /// Upstream content URL, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FlatEntry {
    pub fn file(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: EntryMode::File,
            sha: sha.into(),
            url: None,
        }
    }

    pub fn dir(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: EntryMode::Dir,
            sha: sha.into(),
            url: None,
        }
    }

    /// Dotfiles and dot-directories at the root are never shown.
    pub fn is_hidden(&self) -> bool {
        self.path.starts_with('.')
    }
}

/// Owner/name pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Blob content as returned by the source: base64 text, possibly line-wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRecord {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
