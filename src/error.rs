//! Error types for BinON encoding and decoding.

use crate::codec::CodeByte;

/// Errors that can occur while encoding, decoding, hashing or converting objects.
///
/// Every variant is scoped to the call that produced it: an encode or decode
/// that fails leaves no usable partial result behind.
#[derive(Debug, thiserror::Error)]
pub enum BinonError {
    #[error("bad code byte: 0x{0:02X}")]
    BadCodeByte(u8),

    #[error("integer out of 64-bit range: {0}")]
    IntRange(String),

    #[error(
        "strict container expected {expected} but found {actual} at index {index}: {value}"
    )]
    BadElemType {
        expected: CodeByte,
        actual: CodeByte,
        index: usize,
        value: String,
    },

    #[error("strict container has {0} entries but no declared type code")]
    MissingTypeCode(usize),

    #[error("strict container declares {0} Null elements; at most one is allowed")]
    NullRun(usize),

    #[error("duplicate dictionary key: {0}")]
    DuplicateKey(String),

    #[error("cannot hash container used as a dictionary key: {0}")]
    NoHashing(CodeByte),

    #[error("cannot compare container used as a dictionary key: {0}")]
    NoComparing(CodeByte),

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: CodeByte,
    },

    #[error("need {needed} bytes but only {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("invalid UTF-8 string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("declared length {len} exceeds limit {limit}")]
    LengthLimit { len: u64, limit: usize },

    #[error("nesting depth exceeds limit {0}")]
    DepthLimit(usize),

    #[error("{0} trailing bytes after object")]
    TrailingBytes(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned by the encode path.
pub type EncodeError = BinonError;

/// Error returned by the decode path.
pub type DecodeError = BinonError;

impl BinonError {
    /// Returns `true` if the error only means more input is needed.
    ///
    /// The stream reader uses this to distinguish a partially buffered object
    /// from a malformed one.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }

    /// Lower bound on the extra input an incomplete decode needs.
    pub(crate) fn shortfall(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof { needed, remaining } => {
                Some(needed.saturating_sub(*remaining).max(1))
            }
            _ => None,
        }
    }
}
