//! Error types for netamp.

use thiserror::Error;

/// Main error type for all netamp operations.
#[derive(Debug, Error)]
pub enum NetampError {
    /// Structurally invalid frame bytes (too short, bad start marker,
    /// truncated payload).
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// No correlation-matching reply arrived within the deadline.
    #[error("no matching reply within the deadline")]
    Timeout,

    /// I/O error from the underlying UDP socket (bind/send/recv).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Result type alias using NetampError.
pub type Result<T> = std::result::Result<T, NetampError>;
