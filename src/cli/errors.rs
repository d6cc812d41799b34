//! CLI-specific error types
//!
//! Every CLI error ends the process with exit code 1.

use std::fmt;
use std::io;

use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Backing file could not be prepared
    StoreError,
    /// Server failed to start or stopped with an error
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "MOVIE_CLI_CONFIG_ERROR",
            Self::StoreError => "MOVIE_CLI_STORE_ERROR",
            Self::ServeFailed => "MOVIE_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Server failure
    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::serve_failed(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_code() {
        let err = CliError::config_error("port must be > 0");
        assert_eq!(err.to_string(), "MOVIE_CLI_CONFIG_ERROR: port must be > 0");
    }

    #[test]
    fn test_from_store_error() {
        let err = CliError::from(StoreError::io_failure(
            "Failed to create /root/x",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(err.code(), &CliErrorCode::StoreError);
        assert!(err.message().contains("MOVIE_STORE_IO_FAILURE"));
    }
}
