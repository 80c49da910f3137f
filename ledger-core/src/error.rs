//! Errors surfaced at the binary wire boundary.
//!
//! Domain validation outcomes (`CreateAccountResult`, `CreateTransferResult`)
//! are not Rust errors — they are data, returned densely alongside every
//! event exactly as the result-code catalog specifies, even on failure.
//! This module covers the layer underneath that: a malformed wire buffer
//! reaching one of the [`crate::wire`] entry points before it can even be
//! decoded into a typed event.

use std::error::Error;
use std::fmt;

use crate::codec::InvalidDataSize;

/// Convenience alias for the wire boundary's fallible operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// A wire-boundary failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedgerError {
    /// An event buffer did not match the fixed size for its record type.
    InvalidDataSize(InvalidDataSize),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidDataSize(e) => {
                write!(f, "invalid data size: expected {} bytes, got {}", e.expected, e.actual)
            }
        }
    }
}

impl Error for LedgerError {}

impl From<InvalidDataSize> for LedgerError {
    fn from(e: InvalidDataSize) -> Self {
        LedgerError::InvalidDataSize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LedgerError::InvalidDataSize(InvalidDataSize { expected: 128, actual: 64 });
        assert_eq!(err.to_string(), "invalid data size: expected 128 bytes, got 64");
    }
}
