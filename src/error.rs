//! Structured error types for the operational commands.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Extractor options file
    ConfigNotFound,
    ConfigParseError,
    ConfigWriteFailed,

    // Filesystem
    DirectoryCreateFailed,
    Io,

    // Browser cookie store
    CookieStoreUnavailable,
    CookieStoreQuery,

    // External processes
    ExtractorUnavailable,
    ExtractorFailed,
    LaunchFailed,
}

impl ErrorCode {
    /// Process exit code for a failure carrying this code.
    ///
    /// Configuration resolution failures get their own code so operators can
    /// tell them apart from a failed application launch.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::ConfigWriteFailed => 2,
            _ => 1,
        }
    }
}

/// Structured error for library operations.
#[derive(Debug, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct OpsError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl OpsError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            details: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    // Convenience constructors

    pub fn config_not_found(path: &Path) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Config file not found: {}", path.display()),
        )
        .with_path(path)
    }

    pub fn config_parse(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConfigParseError,
            format!("Config parse error in {}: {}", path.display(), err),
        )
        .with_path(path)
    }

    pub fn config_write(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConfigWriteFailed,
            format!("Failed to write config file {}: {}", path.display(), err),
        )
        .with_path(path)
    }

    pub fn directory_create(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::DirectoryCreateFailed,
            format!("Failed to create {}: {}", path.display(), err),
        )
        .with_path(path)
    }

    pub fn io(path: &Path, err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::Io, format!("{}: {}", path.display(), err)).with_path(path)
    }

    pub fn cookie_store_unavailable(path: &Path) -> Self {
        Self::new(
            ErrorCode::CookieStoreUnavailable,
            format!("Cookie store not found: {}", path.display()),
        )
        .with_path(path)
    }

    pub fn cookie_query(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::CookieStoreQuery, err.to_string())
    }

    pub fn extractor_unavailable(program: &str) -> Self {
        Self::new(
            ErrorCode::ExtractorUnavailable,
            format!("Extractor not available: {}", program),
        )
    }

    pub fn extractor_failed(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExtractorFailed, reason)
    }

    pub fn launch_failed(command: &str, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::LaunchFailed,
            format!("Failed to start application '{}': {}", command, err),
        )
    }
}

impl From<rusqlite::Error> for OpsError {
    fn from(err: rusqlite::Error) -> Self {
        OpsError::cookie_query(err)
    }
}

/// Result type for library operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_failure_has_distinct_exit_code() {
        let err = OpsError::config_write(Path::new("x.json"), "read-only filesystem");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            OpsError::launch_failed("python3 app/main.py", "not found").exit_code(),
            1
        );
        assert_eq!(
            OpsError::config_parse(Path::new("x.json"), "eof").exit_code(),
            1
        );
    }

    #[test]
    fn test_error_serializes_code() {
        let err = OpsError::config_parse(Path::new("bad.json"), "expected value")
            .with_details("line 1 column 1");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "CONFIG_PARSE_ERROR");
        assert_eq!(value["path"], "bad.json");
        assert_eq!(value["details"], "line 1 column 1");
    }

    #[test]
    fn test_display_uses_message() {
        let err = OpsError::config_not_found(Path::new("missing.json"));
        assert_eq!(err.to_string(), "Config file not found: missing.json");
    }
}
