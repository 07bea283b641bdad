//! Error types for the conversion engine

use thiserror::Error;

/// Conversion engine errors
///
/// Parse errors clear the canonical instant; clipboard errors are surfaced
/// as advisories and never touch conversion state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    // Numeric field errors
    #[error("Timestamp is not a valid number")]
    InvalidTimestamp,

    #[error("Timestamp exceeds the convertible range")]
    TimestampOutOfRange,

    // Datetime field errors
    #[error("Date/time is malformed or does not exist")]
    InvalidDateTime,

    // Clipboard errors (advisory only)
    #[error("Clipboard is unavailable")]
    ClipboardUnavailable,

    #[error("Clipboard write failed")]
    ClipboardWriteFailed,
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
