//! Precision and exponent bounds.
//!
//! A [`Float`](crate::Float) with precision `p` holds a `p`-bit significand,
//! and a finite non-zero value is `0.1b₂b₃…b_p × 2^exp` with `exp` in
//! [`EXP_MIN`, `EXP_MAX`].

use crate::error::Error;

/// Number of significant bits of a value.
pub type Precision = u64;

/// Binary exponent of a value.
pub type Exponent = i64;

/// Smallest supported precision.
pub const PREC_MIN: Precision = 1;

/// Largest supported precision.
pub const PREC_MAX: Precision = i32::MAX as Precision - 256;

/// Precision used until [`set_default_precision`](crate::set_default_precision) is called.
pub const DEFAULT_PRECISION: Precision = 53;

/// Smallest exponent of a finite non-zero value.
pub const EXP_MIN: Exponent = 1 - (1 << 62);

/// Largest exponent of a finite non-zero value.
pub const EXP_MAX: Exponent = (1 << 62) - 1;

/// Returns `prec` if it lies in [`PREC_MIN`, `PREC_MAX`].
pub fn check_precision(prec: Precision) -> Result<Precision, Error> {
    if (PREC_MIN..=PREC_MAX).contains(&prec) {
        Ok(prec)
    } else {
        Err(Error::InvalidPrecision(prec))
    }
}
