//! Document store error types
//!
//! Error codes:
//! - MOVIE_STORE_NOT_FOUND (REJECT)
//! - MOVIE_STORE_DUPLICATE_ENTRY (REJECT)
//! - MOVIE_STORE_CONFLICT (REJECT)
//! - MOVIE_STORE_IO_FAILURE (ERROR)
//! - MOVIE_STORE_CORRUPT_DATA (ERROR)
//!
//! The store never recovers from any of these locally. Every failure is
//! surfaced as a distinct code so the routing layer can pick a response.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::Path;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller asked for something the collection cannot satisfy
    Reject,
    /// The backing file could not be used
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// Lookup by id, field or list membership matched nothing
    NotFound,
    /// Insert rejected because the title already exists
    DuplicateEntry,
    /// Backing file changed between load and save
    Conflict,
    /// Backing file could not be read or written
    IoFailure,
    /// Backing file content is not a valid collection
    CorruptData,
}

impl StoreErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::NotFound => "MOVIE_STORE_NOT_FOUND",
            StoreErrorCode::DuplicateEntry => "MOVIE_STORE_DUPLICATE_ENTRY",
            StoreErrorCode::Conflict => "MOVIE_STORE_CONFLICT",
            StoreErrorCode::IoFailure => "MOVIE_STORE_IO_FAILURE",
            StoreErrorCode::CorruptData => "MOVIE_STORE_CORRUPT_DATA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::NotFound
            | StoreErrorCode::DuplicateEntry
            | StoreErrorCode::Conflict => Severity::Reject,
            StoreErrorCode::IoFailure | StoreErrorCode::CorruptData => Severity::Error,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional underlying cause
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// No record has the given id
    pub fn not_found_id(id: &str) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("no record with id '{}'", id))
    }

    /// No record has `field` equal to the given value
    pub fn not_found_field(field: &str, value: impl fmt::Display) -> Self {
        Self::new(
            StoreErrorCode::NotFound,
            format!("no record with {} = {}", field, value),
        )
    }

    /// No record lists `value` in its `field` collection
    pub fn not_found_in_collection(field: &str, value: &str) -> Self {
        Self::new(
            StoreErrorCode::NotFound,
            format!("no record lists '{}' in {}", value, field),
        )
    }

    /// A record with this title already exists
    pub fn duplicate_entry(title: &str) -> Self {
        Self::new(
            StoreErrorCode::DuplicateEntry,
            format!("a record titled '{}' already exists", title),
        )
    }

    /// The backing file was modified by another writer since it was loaded
    pub fn conflict(path: &Path) -> Self {
        Self::new(
            StoreErrorCode::Conflict,
            format!("{} changed since it was loaded", path.display()),
        )
    }

    /// Reading or writing the backing file failed
    pub fn io_failure(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::IoFailure,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The backing file does not hold a well-formed collection
    pub fn corrupt_data(path: &Path, source: serde_json::Error) -> Self {
        Self {
            code: StoreErrorCode::CorruptData,
            message: format!("{} is not a valid collection: {}", path.display(), source),
            source: Some(Box::new(source)),
        }
    }

    /// Serializing a collection failed
    pub fn encode_failed(source: serde_json::Error) -> Self {
        Self {
            code: StoreErrorCode::CorruptData,
            message: format!("collection could not be serialized: {}", source),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
