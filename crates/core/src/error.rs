//! Error types for the lexica indexing engine
//!
//! This module defines the error taxonomy shared by all crates.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for indexing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the indexing engine
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (store open/flush/read failures)
    ///
    /// The store remains usable after an I/O error; callers are expected
    /// to log and retry.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed on-disk data (bad magic, CRC mismatch, truncated posting list)
    ///
    /// Affects a single record or term; other terms stay readable.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Invalid argument (empty term, inconsistent bounds)
    ///
    /// Rejected before any state is touched.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
    }

    #[test]
    fn test_error_display_corrupt_record() {
        let err = Error::CorruptRecord("posting list length 13 not a multiple of 8".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Corrupt record"));
        assert!(msg.contains("13"));
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty term".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Invalid input"));
        assert!(msg.contains("empty term"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<u32, serde_json::Error> =
            serde_json::from_str("not json");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::InvalidInput("test".to_string()))
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }
}
