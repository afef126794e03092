//! Error types.
//!
//! - `DateCodeError`: a single period code could not be parsed
//! - `LoadError`: one indicator could not be retrieved or decoded
//! - `AppError`: binary-level error carrying a process exit code

use thiserror::Error;

/// A date code that does not match the expected encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateCodeError {
    #[error("invalid monthly date code '{code}' (expected YYYYMmm or YYYY-MM)")]
    InvalidMonthly { code: String },
    #[error("invalid quarterly date code '{code}' (expected YYYY-Qn)")]
    InvalidQuarterly { code: String },
    #[error("quarter {quarter} out of range 1..=4 in '{code}'")]
    QuarterOutOfRange { code: String, quarter: u32 },
    #[error("invalid annual date code '{code}' (expected YYYY)")]
    InvalidAnnual { code: String },
}

/// Retrieval or payload failure for one indicator.
///
/// Sources never retry; the caller decides what to show instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{source_name} request failed: {message}")]
    Transport { source_name: &'static str, message: String },
    #[error("{source_name} request failed with status {status}")]
    Status { source_name: &'static str, status: u16 },
    #[error("malformed {source_name} payload: {message}")]
    Payload { source_name: &'static str, message: String },
    #[error("failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Error surfaced by the binary, mapped to an exit code by `main`.
#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        let exit_code = match err {
            LoadError::Io { .. } => 2,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}
