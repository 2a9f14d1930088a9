//! # Error Types
//!
//! Custom error types for Mecanum Pad using `thiserror`.

use thiserror::Error;

/// Main error type for Mecanum Pad
#[derive(Debug, Error)]
pub enum MecanumPadError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Controller device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// Controller did not appear before the connect timeout
    #[error("No controller at {path} after {timeout_s}s")]
    ControllerNotFound { path: String, timeout_s: u64 },

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial ports could be opened
    #[error("No motor board found (tried: {0})")]
    SerialPortNotFound(String),

    /// The board writer task has exited, frames can no longer be delivered
    #[error("Motor board writer is no longer running")]
    BoardDisconnected,
}

/// Result type alias for Mecanum Pad
pub type Result<T> = std::result::Result<T, MecanumPadError>;
