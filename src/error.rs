use std::fmt;

use thiserror::Error;

use crate::precision::{PREC_MAX, PREC_MIN, Precision};

/// Errors reported by fallible operations.
///
/// Rounding is never an error: inexact results are reported through
/// [`Ternary`](crate::Ternary).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// Requested precision outside [`PREC_MIN`, `PREC_MAX`].
    #[error("precision {0} is outside [{min}, {max}]", min = PREC_MIN, max = PREC_MAX)]
    InvalidPrecision(Precision),
    /// Base outside the range supported by the operation.
    #[error("unsupported base {0}")]
    InvalidBase(u32),
    /// Requested significant-digit count can never be produced.
    #[error("cannot produce {0} significant digits")]
    InvalidDigits(usize),
    /// Malformed numeral.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// An error returned when parsing a numeral from a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
    position: usize,
}

impl ParseError {
    pub(crate) const fn empty() -> Self {
        Self {
            kind: ErrorKind::Empty,
            position: 0,
        }
    }

    pub(crate) const fn invalid(position: usize) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            position,
        }
    }

    /// Byte offset at which the input stopped making sense.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Reports whether the input held nothing but whitespace.
    pub const fn is_empty(&self) -> bool {
        matches!(self.kind, ErrorKind::Empty)
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Empty => write!(f, "cannot parse number from empty string"),
            ErrorKind::Invalid => write!(f, "invalid number literal at byte {}", self.position),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    Empty,
    Invalid,
}
