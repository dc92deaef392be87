//! Error types for cos-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

use crate::backend::RawError;

/// Result type alias for cos-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cos-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Bad construction input: empty bucket, missing endpoint and region,
    /// unparsable endpoint
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bad call-site input, such as a non-positive page size
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote store confirmed the object does not exist
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Any other failure reported by the remote collaborator
    #[error("{op} '{key}' failed: {source}")]
    Remote {
        op: &'static str,
        key: String,
        #[source]
        source: RawError,
    },

    /// Feature not supported by this backend
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn remote(op: &'static str, key: impl Into<String>, source: RawError) -> Self {
        Error::Remote {
            op,
            key: key.into(),
            source,
        }
    }

    /// Whether this error means the object is missing.
    ///
    /// True for the `ObjectNotFound` sentinel and for remote failures whose
    /// cause is a not-found response (e.g. from `get`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ObjectNotFound(_)
                | Error::Remote {
                    source: RawError::NotFound(_),
                    ..
                }
        )
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) | Error::InvalidArgument(_) => 2, // UsageError
            Error::InvalidPath(_) | Error::Config(_) => 2,            // UsageError
            Error::Remote {
                source: RawError::NotFound(_),
                ..
            } => 5, // NotFound
            Error::Remote {
                source: RawError::AccessDenied(_),
                ..
            } => 4, // AuthError
            Error::Remote { .. } => 3,                                // NetworkError
            Error::ObjectNotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            Error::UnsupportedFeature(_) => 7,                        // UnsupportedFeature
            _ => 1,                                                   // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidConfig("test".into()).exit_code(), 2);
        assert_eq!(Error::InvalidArgument("test".into()).exit_code(), 2);
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(
            Error::remote("get", "a", RawError::Transport("reset".into())).exit_code(),
            3
        );
        assert_eq!(
            Error::remote("get", "a", RawError::AccessDenied("403".into())).exit_code(),
            4
        );
        assert_eq!(
            Error::remote("get", "a", RawError::NotFound("404".into())).exit_code(),
            5
        );
        assert_eq!(Error::ObjectNotFound("a".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("prod".into()).exit_code(), 5);
        assert_eq!(Error::UnsupportedFeature("upload".into()).exit_code(), 7);
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::ObjectNotFound("a.txt".into()).is_not_found());
        assert!(Error::remote("get", "a.txt", RawError::NotFound("NoSuchKey".into())).is_not_found());
        assert!(!Error::remote("get", "a.txt", RawError::Transport("timeout".into())).is_not_found());
        assert!(!Error::InvalidArgument("page size".into()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = Error::ObjectNotFound("docs/a.txt".into());
        assert_eq!(err.to_string(), "Object not found: docs/a.txt");

        let err = Error::remote("put object", "a.txt", RawError::Transport("broken pipe".into()));
        assert_eq!(err.to_string(), "put object 'a.txt' failed: broken pipe");
    }
}
