//! Error types for the count core library

use thiserror::Error;

/// Exit code for a clean run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for invalid configuration, reported before any I/O
pub const EXIT_CONFIG: i32 = 1;

/// Exit code for a fatal I/O error during the copy loop
pub const EXIT_IO: i32 = 2;

/// Main error type for count operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A size argument could not be parsed
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// The input source signalled a hard fault
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    /// The output sink refused data
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) | Error::InvalidSize(_) => EXIT_CONFIG,
            Error::Read(_) | Error::Write(_) => EXIT_IO,
        }
    }
}

/// Result type alias using the count error type
pub type Result<T> = std::result::Result<T, Error>;
