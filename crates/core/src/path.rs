//! Path parsing
//!
//! Remote paths have the format `profile[/key]`. The profile names a
//! configured bucket; everything after the first `/` is the object key or
//! key prefix.

use crate::error::{Error, Result};

/// A parsed remote path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Profile name
    pub profile: String,
    /// Object key or prefix (empty for the bucket root)
    pub key: String,
}

impl RemotePath {
    pub fn new(profile: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            key: key.into(),
        }
    }

    /// Whether the key denotes a prefix rather than a single object
    pub fn is_dir(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// Require a non-empty key, for commands that address one object
    pub fn require_key(&self) -> Result<&str> {
        if self.key.is_empty() || self.key.ends_with('/') {
            return Err(Error::InvalidPath(format!(
                "'{self}' does not name an object. Expected: profile/key"
            )));
        }
        Ok(&self.key)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}", self.profile)
        } else {
            write!(f, "{}/{}", self.profile, self.key)
        }
    }
}

/// Parse `profile[/key]`
pub fn parse_remote_path(path: &str) -> Result<RemotePath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let (profile, key) = match path.split_once('/') {
        Some((profile, key)) => (profile, key),
        None => (path, ""),
    };

    if profile.is_empty() {
        return Err(Error::InvalidPath(format!(
            "Invalid path format: '{path}'. Expected: profile[/key]"
        )));
    }

    Ok(RemotePath::new(profile, key))
}
