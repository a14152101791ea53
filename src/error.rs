//! Unified error type for I/O-facing operations.
//!
//! Lookups and mutations on the in-memory stores never fail; only loading
//! facts, persisting snapshots and CLI argument handling can.

use thiserror::Error;

/// All errors that can occur while loading or persisting engine state.
#[derive(Error, Debug)]
pub enum BeanError {
    /// I/O error (file read/write, directory access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error (bincode)
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// A facts batch could not be parsed
    #[error("Invalid facts file '{path}': {source}")]
    Facts {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to load a snapshot from disk
    #[error("Failed to load snapshot from {path}: {message}")]
    SnapshotLoad {
        path: String,
        message: String,
    },

    /// Directory does not exist
    #[error("Directory does not exist: {0}")]
    DirNotFound(String),

    /// Mutually exclusive flags or other argument validation error
    #[error("{0}")]
    InvalidArgs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = BeanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_dir_not_found_display() {
        let err = BeanError::DirNotFound("/nonexistent".to_string());
        assert!(err.to_string().contains("/nonexistent"));
    }

    #[test]
    fn test_facts_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = BeanError::Facts {
            path: "UserService.facts.json".to_string(),
            source,
        };
        assert!(err.to_string().contains("UserService.facts.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_snapshot_load_display() {
        let err = BeanError::SnapshotLoad {
            path: "/tmp/x.beans".to_string(),
            message: "seek error".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x.beans"));
        assert!(msg.contains("seek error"));
    }

    #[test]
    fn test_json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let bean_err: BeanError = json_err.into();
        assert!(matches!(bean_err, BeanError::Json(_)));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let bean_err: BeanError = io_err.into();
        assert!(matches!(bean_err, BeanError::Io(_)));
    }
}
