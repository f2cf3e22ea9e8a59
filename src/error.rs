//! Custom error types for fab
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use nix::errno::Errno;
use thiserror::Error;

/// The main error type for fab operations
#[derive(Error, Debug)]
pub enum FabError {
    /// A path failed validation and cannot be interpolated into a shell command
    #[error("Rejected unsafe path: {0}")]
    PathRejected(String),

    /// fork, exec or wait failed at the OS level
    #[error("{operation}() failed, errno={errno}")]
    EngineFault {
        operation: &'static str,
        errno: i32,
    },

    /// The shell command ran but exited with a non-zero status
    #[error("Process exited non-successfully, exit code {exit_code}")]
    CommandFailed { exit_code: u8, output: String },

    /// Captured output could not be read back
    #[error("Failed to read output: {0}")]
    LogRead(String),

    /// The device could not run a trivial command with the expected result
    #[error("Unable to execute code on the device: expected {expected}, got {actual}")]
    SanityCheckFailed { expected: u8, actual: u8 },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl FabError {
    /// Create an engine fault from a failed system call
    pub fn engine(operation: &'static str, errno: Errno) -> Self {
        Self::EngineFault {
            operation,
            errno: errno as i32,
        }
    }

    /// Check if this is a non-zero exit of the executed command
    pub fn is_command_failed(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    /// Output captured from a failed command, if any
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FabError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FabError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for fab operations
pub type FabResult<T> = Result<T, FabError>;
