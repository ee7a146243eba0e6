//! # Conversion Utilities
//!
//! Conversions between [`Float`] and native integers and IEEE 754
//! double-precision floats.
//!
//! ## IEEE 754 Layout
//!
//! Standard 64-bit IEEE 754 double-precision format:
//! ```text
//! [Sign: 1 bit][Exponent: 11 bits][Fraction: 52 bits]
//! Bit:  63      62           52   51            0
//! ```
//!
//! ## Conversion Features
//!
//! - **Correct rounding**: assignments round into the destination precision and
//!   report a [`Ternary`] status
//! - **Special value support**: ±0, ±∞ and NaN map to the matching [`Kind`]
//! - **Saturation**: out-of-range values saturate to the extreme native value
//!   instead of failing
//!
//! ## Examples
//!
//! ```rust
//! use mpfloat::{Float, RoundingMode, Ternary};
//!
//! let mut x = Float::with_precision(53).unwrap();
//! assert_eq!(x.set_f64(3.141592653589793, RoundingMode::Nearest), Ternary::Exact);
//! assert_eq!(x.to_f64(RoundingMode::Nearest), 3.141592653589793);
//!
//! x.set_f64(f64::NEG_INFINITY, RoundingMode::Nearest);
//! assert!(x.is_infinity() && x.sign());
//! ```

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;

use crate::float::{Float, Kind};
use crate::precision::Exponent;
use crate::round::{
    Outcome, Rounded, RoundingMode, Ternary, Ties, min_significand, round_exact, round_shifted,
};

const F64_PRECISION: i64 = f64::MANTISSA_DIGITS as i64;
/// Exponent (in `0.1b × 2^exp` form) of the smallest normal double.
const F64_EXP_MIN_NORMAL: i64 = f64::MIN_EXP as i64;
/// Exponent of the smallest subnormal's last bit.
const F64_ULP_MIN: i64 = F64_EXP_MIN_NORMAL - F64_PRECISION;
const F64_EXP_MAX: i64 = f64::MAX_EXP as i64;

/// `2^q` for `q` in `[-1074, 1023]`.
fn pow2(q: i64) -> f64 {
    debug_assert!((F64_ULP_MIN..F64_EXP_MAX).contains(&q));
    if q >= F64_EXP_MIN_NORMAL - 1 {
        f64::from_bits(((q + 1023) as u64) << 52)
    } else {
        f64::from_bits(1u64 << (q - F64_ULP_MIN))
    }
}

fn with_sign(value: f64, negative: bool) -> f64 {
    if negative { -value } else { value }
}

impl Float {
    /// Assigns `value`, rounded to this value's precision.
    pub fn set_i64(&mut self, value: i64, rnd: RoundingMode) -> Ternary {
        let rounded = round_exact(
            value < 0,
            &BigUint::from(value.unsigned_abs()),
            0,
            false,
            self.prec,
            rnd,
        );
        self.store(rounded)
    }

    /// Assigns `value`, rounded to this value's precision.
    pub fn set_u64(&mut self, value: u64, rnd: RoundingMode) -> Ternary {
        self.store(round_exact(false, &BigUint::from(value), 0, false, self.prec, rnd))
    }

    /// Assigns `value`, rounded to this value's precision.
    ///
    /// Signed zeros, infinities and NaN are kept as such.
    pub fn set_f64(&mut self, value: f64, rnd: RoundingMode) -> Ternary {
        let negative = value.is_sign_negative();
        if value.is_nan() {
            self.set_nan();
            return Ternary::Exact;
        }
        if value.is_infinite() {
            return self.store(Rounded::infinity(negative));
        }
        if value == 0.0 {
            return self.store(Rounded::zero(negative));
        }

        let bits = value.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1 << 52) - 1);
        let (m, e) = if biased == 0 {
            (fraction, F64_ULP_MIN)
        } else {
            (fraction | (1 << 52), biased - 1075)
        };
        self.store(round_exact(
            negative,
            &BigUint::from(m),
            i128::from(e),
            false,
            self.prec,
            rnd,
        ))
    }

    /// Rounds to an integer and converts to `i64`, saturating at the bounds.
    ///
    /// NaN converts to 0; infinities saturate.
    pub fn to_i64(&self, rnd: RoundingMode) -> i64 {
        match self.kind {
            Kind::Nan | Kind::Zero => 0,
            Kind::Infinity => {
                if self.sign {
                    i64::MIN
                } else {
                    i64::MAX
                }
            }
            Kind::Normal if self.exp > i64::from(i64::BITS) => {
                if self.sign {
                    i64::MIN
                } else {
                    i64::MAX
                }
            }
            Kind::Normal => {
                let (magnitude, _) = self.round_integer(rnd, Ties::Even);
                let sign = if self.sign { Sign::Minus } else { Sign::Plus };
                BigInt::from_biguint(sign, magnitude)
                    .to_i64()
                    .unwrap_or(if self.sign { i64::MIN } else { i64::MAX })
            }
        }
    }

    /// Rounds to a double. Values beyond the double range saturate to
    /// `±f64::MAX` or become `±∞` depending on the mode; tiny values become
    /// zeros or subnormals.
    pub fn to_f64(&self, rnd: RoundingMode) -> f64 {
        match self.kind {
            Kind::Nan => f64::NAN,
            Kind::Infinity => with_sign(f64::INFINITY, self.sign),
            Kind::Zero => with_sign(0.0, self.sign),
            Kind::Normal => with_sign(self.to_f64_magnitude(rnd), self.sign),
        }
    }

    fn to_f64_magnitude(&self, rnd: RoundingMode) -> f64 {
        let negative = self.sign;
        let exp = self.exp;
        if exp > F64_EXP_MAX {
            return if rnd.is_away(negative) {
                f64::INFINITY
            } else {
                f64::MAX
            };
        }

        // Subnormals lose precision as the exponent decreases.
        let prec = if exp >= F64_EXP_MIN_NORMAL {
            F64_PRECISION
        } else {
            exp - F64_ULP_MIN
        };
        if prec <= 0 {
            let to_min = match rnd {
                RoundingMode::Nearest => {
                    prec == 0 && self.significand() != min_significand(self.prec)
                }
                _ => rnd.is_away(negative),
            };
            return if to_min { pow2(F64_ULP_MIN) } else { 0.0 };
        }

        let prec = prec as u64;
        let significand = self.significand();
        let mut kept = if self.prec > prec {
            round_shifted(negative, &significand, self.prec - prec, false, rnd, Ties::Even).0
        } else {
            significand << (prec - self.prec)
        };
        let mut q = exp - prec as i64;
        if kept.bits() > prec {
            kept >>= 1u8;
            q += 1;
        }
        if q + kept.bits() as i64 > F64_EXP_MAX {
            return f64::INFINITY;
        }
        // At most 53 bits, so the conversion and the scaling are exact.
        let kept = kept.to_u64().unwrap_or(u64::MAX) as f64;
        kept * pow2(q)
    }

    /// Splits into a double `d` with `0.5 <= |d| < 1`, rounded to 53 bits,
    /// and an exponent `e` with `d × 2^e` equal to the rounded value.
    ///
    /// Zeros, infinities and NaN return the matching double and exponent 0.
    pub fn to_f64_exp(&self, rnd: RoundingMode) -> (f64, Exponent) {
        if !self.is_normal() {
            return (self.to_f64(rnd), 0);
        }
        let rounded = round_exact(
            self.sign,
            &self.significand(),
            -i128::from(self.prec),
            false,
            F64_PRECISION as u64,
            rnd,
        );
        // Values in [0.5, 1) never leave the exponent range.
        let Outcome::Finite { exp, significand } = rounded.outcome else {
            return (self.to_f64(rnd), 0);
        };
        let d = significand.to_u64().unwrap_or(0) as f64 * pow2(-F64_PRECISION);
        (with_sign(d, self.sign), self.exp + exp)
    }

    /// Assigns `op` rounded to this value's precision, scaled into
    /// `0.5 <= |self| < 1`, and returns the exponent `e` such that
    /// `self × 2^e` is the rounded value of `op`.
    ///
    /// Zeros, infinities and NaN are copied and the exponent is 0.
    pub fn frexp(&mut self, op: &Float, rnd: RoundingMode) -> (Exponent, Ternary) {
        if !op.is_normal() {
            return (0, self.set(op, rnd));
        }
        let rounded = round_exact(
            op.sign,
            &op.significand(),
            -i128::from(op.prec),
            false,
            self.prec,
            rnd,
        );
        let ternary = self.store(rounded);
        // A carry rounds up to 1.0 = 0.5 × 2^1.
        let exp = op.exp + self.exp;
        self.exp = 0;
        (exp, ternary)
    }
}

/// Exact conversion using a 53-bit value.
///
/// # Examples
///
/// ```rust
/// use mpfloat::Float;
///
/// let x = Float::from(3.14159);
/// assert_eq!(x.precision(), 53);
/// let back: f64 = (&x).into();
/// assert_eq!(back, 3.14159);
/// ```
impl From<f64> for Float {
    fn from(value: f64) -> Self {
        let mut float = Self::new_unchecked(F64_PRECISION as u64);
        float.set_f64(value, RoundingMode::Nearest);
        float
    }
}

/// Exact conversion using a 64-bit value.
impl From<i64> for Float {
    fn from(value: i64) -> Self {
        let mut float = Self::new_unchecked(64);
        float.set_i64(value, RoundingMode::Nearest);
        float
    }
}

/// Rounds to nearest.
impl From<&Float> for f64 {
    fn from(value: &Float) -> Self {
        value.to_f64(RoundingMode::Nearest)
    }
}
