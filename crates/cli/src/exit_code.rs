//! Exit code definitions for cosctl
//!
//! Scripts depend on these values. Changing one is a breaking change.

use cos_core::Error;

/// Exit codes for the cosctl binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error, including local I/O and config file failures
    GeneralError = 1,

    /// User input error: invalid arguments, malformed path, bad endpoint
    UsageError = 2,

    /// Remote call failed for a reason other than auth or absence
    NetworkError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Object or profile does not exist
    NotFound = 5,

    /// Operation is not supported by the COS backend
    UnsupportedFeature = 7,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            7 => Some(Self::UnsupportedFeature),
            _ => None,
        }
    }

    /// Exit code for a library error
    pub fn from_error(error: &Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or path format",
            Self::NetworkError => "Remote request failed",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Resource not found",
            Self::UnsupportedFeature => "Feature not supported by backend",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_core::RawError;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UsageError.as_i32(), 2);
        assert_eq!(ExitCode::NotFound.as_i32(), 5);
        assert_eq!(ExitCode::UnsupportedFeature.as_i32(), 7);
        assert_eq!(ExitCode::from_i32(6), None);
    }

    #[test]
    fn test_every_library_error_maps_to_known_code() {
        let cases = [
            (Error::InvalidConfig("no endpoint".into()), ExitCode::UsageError),
            (Error::InvalidArgument("page size".into()), ExitCode::UsageError),
            (Error::ObjectNotFound("a.txt".into()), ExitCode::NotFound),
            (Error::ProfileNotFound("prod".into()), ExitCode::NotFound),
            (
                Error::UnsupportedFeature("upload".into()),
                ExitCode::UnsupportedFeature,
            ),
            (Error::Config("bad file".into()), ExitCode::UsageError),
        ];
        for (error, expected) in cases {
            assert_eq!(ExitCode::from_error(&error), expected, "{error}");
        }
    }

    #[test]
    fn test_remote_error_codes() {
        let remote = |source| Error::Remote {
            op: "get object",
            key: "a.txt".into(),
            source,
        };
        assert_eq!(
            ExitCode::from_error(&remote(RawError::NotFound("404".into()))),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&remote(RawError::AccessDenied("403".into()))),
            ExitCode::AuthError
        );
        assert_eq!(
            ExitCode::from_error(&remote(RawError::Transport("reset".into()))),
            ExitCode::NetworkError
        );
    }

    #[test]
    fn test_exit_code_display() {
        let display = format!("{}", ExitCode::NotFound);
        assert!(display.contains("5"));
        assert!(display.contains("not found"));
    }
}
