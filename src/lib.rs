//! # mpfloat
//!
//! Arbitrary-precision binary floating-point numbers with correct rounding.
//! Every value carries its own precision (in bits), and every operation that
//! may lose information rounds under an explicit [`RoundingMode`] and reports
//! which way it went through a [`Ternary`] status.
//!
//! ## Overview
//!
//! mpfloat provides:
//! - **Configurable precision**: from [`PREC_MIN`] to [`PREC_MAX`] bits per value
//! - **Five rounding modes**: nearest-even, toward zero, up, down and away from zero
//! - **Ternary status**: every rounding operation says whether the result is exact,
//!   above or below the exact value
//! - **Special values**: signed zeros, signed infinities and NaN
//! - **Conversions**: native integers, `f64`, and strings in any base from 2 to 62
//!
//! ## Architecture
//!
//! ### Mantissa Module
//! Stores significands as vectors of 64-bit limbs, normalized so the most
//! significant bit of the top limb is always set for finite non-zero values.
//!
//! ### Round Module
//! Rounds exact intermediate results (held as `num-bigint` integers) to a
//! target precision, and maps exponent overflow/underflow to infinities,
//! zeros or the extreme finite values depending on the mode.
//!
//! ### Float Module
//! Implements the [`Float`] type with its lifecycle, conversions,
//! classification queries and basic arithmetic.
//!
//! ### Radix Helpers
//! Digit tables and bounded-precision powers used to convert between
//! binary and any base from 2 to 62, including values whose decimal
//! exponent runs into the billions.
//!
//! ## Quick Start
//!
//! ```rust
//! use mpfloat::{Float, RoundingMode, Ternary};
//!
//! let mut x = Float::with_precision(4).unwrap();
//! let t = x.set_i64(255, RoundingMode::Nearest);
//! assert_eq!(t, Ternary::Greater);
//! assert_eq!(x.to_i64(RoundingMode::Nearest), 256);
//!
//! let mut pi = Float::with_precision(53).unwrap();
//! pi.set_str("3.14159265358979", 10, RoundingMode::Nearest).unwrap();
//! assert_eq!(pi.to_f64(RoundingMode::Nearest), 3.14159265358979);
//! ```
//!
//! ## Special Values
//!
//! ```rust
//! use mpfloat::Float;
//!
//! let mut x = Float::with_precision(10).unwrap();
//! x.set_zero(true);
//! assert!(x.is_zero());
//! assert!(x.sign());
//!
//! x.set_inf(false);
//! assert!(x.is_infinity());
//!
//! x.set_nan();
//! assert!(x.is_nan());
//! ```

pub mod config;
pub mod error;
pub mod float;
pub mod mantissa;
pub mod precision;
mod radix;
pub mod round;

// Re-export the main types for convenience
pub use config::{
    Config, default_precision, default_rounding_mode, set_default_precision,
    set_default_rounding_mode,
};
pub use error::{Error, ParseError};
pub use float::string::MAX_DIGITS;
pub use float::{Float, Kind};
pub use mantissa::{Limb, Mantissa};
pub use precision::{EXP_MAX, EXP_MIN, Exponent, PREC_MAX, PREC_MIN, Precision};
pub use round::{RoundingMode, Ternary};

pub mod prelude {
    //! Prelude module for mpfloat.
    //!
    //! This module re-exports commonly used types and traits from the crate,
    //! allowing for easier imports in user code.

    pub use crate::error::Error;
    pub use crate::float::Float;
    pub use crate::precision::{Exponent, Precision};
    pub use crate::round::{RoundingMode, Ternary};
}
