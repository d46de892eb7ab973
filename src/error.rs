//! Error types for batch plotting.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Automation status codes understood by the converter.
///
/// Values follow the HRESULTs reported by COM automation servers so that
/// backends bridging a real application can pass codes through unchanged.
pub mod codes {
    /// Application is busy and rejected the call (RPC_E_CALL_REJECTED).
    pub const CALL_REJECTED: u32 = 0x8001_010A;
    /// Program identifier is not registered (REGDB_E_CLASSNOTREG).
    pub const CLASS_NOT_REGISTERED: u32 = 0x8004_0154;
    /// Unspecified failure (E_FAIL).
    pub const FAIL: u32 = 0x8000_4005;
}

/// Error returned by a call into the drawing application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (0x{code:08X})")]
pub struct AutomationError {
    /// Status code of the failed call.
    pub code: u32,
    /// Human-readable description.
    pub message: String,
}

impl AutomationError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The application rejected the call because it is busy.
    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(codes::CALL_REJECTED, message)
    }

    /// Generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(codes::FAIL, message)
    }

    /// Whether waiting and retrying the call is expected to help.
    pub fn is_busy(&self) -> bool {
        self.code == codes::CALL_REJECTED
    }
}

/// Why enumeration produced nothing to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoInputReason {
    Missing,
    NotADirectory,
    Empty,
}

impl fmt::Display for NoInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoInputReason::Missing => write!(f, "folder does not exist"),
            NoInputReason::NotADirectory => write!(f, "path is not a folder"),
            NoInputReason::Empty => write!(f, "no matching drawings found"),
        }
    }
}

/// Terminal errors of a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Nothing to convert in {}: {reason}", dir.display())]
    NoInput { dir: PathBuf, reason: NoInputReason },

    #[error("Failed to initialize the application after {attempts} attempt(s): {last}")]
    InitRetriesExhausted { attempts: u32, last: AutomationError },

    #[error("Automation error: {0}")]
    Fatal(AutomationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No input folder given (pass INPUT_DIR or set input_dir in the config file)")]
    MissingInputDir,

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;
