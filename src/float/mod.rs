use std::fmt::{self, Debug};
use std::mem;

use num_bigint::BigUint;
use tracing::trace;

use crate::config;
use crate::error::Error;
use crate::mantissa::Mantissa;
use crate::precision::{Exponent, Precision, check_precision};
use crate::round::{Outcome, Rounded, Ternary};

pub mod arithmetic;
pub mod assign;
pub mod classify;
pub mod cmp;
pub mod converter;
pub mod math;
pub mod string;

/// What a [`Float`] currently holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// Finite and non-zero, with a normalized mantissa.
    Normal,
    Zero,
    Infinity,
    /// Not a number. The sign carries no meaning.
    Nan,
}

/// An arbitrary-precision binary floating-point number.
///
/// A finite non-zero value is `±0.1b₂…b_p × 2^exp` where `p` is the
/// precision. Zeros and infinities keep their sign; the exponent and
/// mantissa of non-finite or zero values are meaningless.
///
/// The precision only changes through [`set_precision`][Self::set_precision]
/// and [`prec_round`][Self::prec_round]; every assignment rounds into it.
#[derive(Clone)]
pub struct Float {
    sign: bool,
    kind: Kind,
    exp: Exponent,
    prec: Precision,
    mantissa: Mantissa,
}

impl Float {
    /// Creates a value at the process-wide default precision.
    ///
    /// The value is NaN until something is assigned to it.
    pub fn new() -> Self {
        Self::new_unchecked(config::default_precision())
    }

    /// Creates a value with `prec` bits of precision.
    ///
    /// The value is NaN until something is assigned to it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPrecision`] if `prec` is outside
    /// [`PREC_MIN`](crate::PREC_MIN)..=[`PREC_MAX`](crate::PREC_MAX).
    pub fn with_precision(prec: Precision) -> Result<Self, Error> {
        Ok(Self::new_unchecked(check_precision(prec)?))
    }

    pub(crate) fn new_unchecked(prec: Precision) -> Self {
        Self {
            sign: false,
            kind: Kind::Nan,
            exp: 0,
            prec,
            mantissa: Mantissa::zeros(prec),
        }
    }

    /// Creates `n` independent values at the default precision, in order.
    ///
    /// A non-positive `n` yields an empty vector.
    pub fn batch(n: isize) -> Vec<Self> {
        let prec = config::default_precision();
        (0..n.max(0)).map(|_| Self::new_unchecked(prec)).collect()
    }

    /// Creates `n` independent values with `prec` bits of precision.
    ///
    /// A non-positive `n` yields an empty vector.
    pub fn batch_with_precision(n: isize, prec: Precision) -> Result<Vec<Self>, Error> {
        let prec = check_precision(prec)?;
        Ok((0..n.max(0)).map(|_| Self::new_unchecked(prec)).collect())
    }

    /// Releases the value and its mantissa storage.
    pub fn clear(self) {
        trace!(prec = self.prec, "clearing value");
        drop(self);
    }

    pub fn precision(&self) -> Precision {
        self.prec
    }

    /// Changes the precision, discarding the value (it becomes NaN).
    ///
    /// Use [`prec_round`][Self::prec_round] to keep the value.
    pub fn set_precision(&mut self, prec: Precision) -> Result<(), Error> {
        let prec = check_precision(prec)?;
        trace!(from = self.prec, to = prec, "reallocating mantissa");
        self.prec = prec;
        self.mantissa = Mantissa::zeros(prec);
        self.set_nan();
        Ok(())
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// `true` for negative values, including `-0` and `-∞`.
    pub fn sign(&self) -> bool {
        self.sign
    }

    /// The exponent of a finite non-zero value.
    pub fn exponent(&self) -> Option<Exponent> {
        self.is_normal().then_some(self.exp)
    }

    pub fn mantissa(&self) -> &Mantissa {
        &self.mantissa
    }

    pub fn is_nan(&self) -> bool {
        self.kind == Kind::Nan
    }

    pub fn is_infinity(&self) -> bool {
        self.kind == Kind::Infinity
    }

    pub fn is_zero(&self) -> bool {
        self.kind == Kind::Zero
    }

    /// Finite and non-zero.
    pub fn is_normal(&self) -> bool {
        self.kind == Kind::Normal
    }

    /// Neither infinite nor NaN.
    pub fn is_finite(&self) -> bool {
        matches!(self.kind, Kind::Normal | Kind::Zero)
    }

    pub fn set_nan(&mut self) {
        self.sign = false;
        self.kind = Kind::Nan;
    }

    /// Sets an infinity; `sign` is `true` for `-∞`.
    pub fn set_inf(&mut self, sign: bool) {
        self.sign = sign;
        self.kind = Kind::Infinity;
    }

    /// Sets a zero; `sign` is `true` for `-0`.
    pub fn set_zero(&mut self, sign: bool) {
        self.sign = sign;
        self.kind = Kind::Zero;
    }

    /// Exchanges everything, precision included, with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// The `p`-bit significand of a finite non-zero value as an integer,
    /// so that the value is `±significand × 2^(exp - p)`.
    pub(crate) fn significand(&self) -> BigUint {
        self.mantissa.to_significand(self.prec)
    }

    /// Exponent of the last significand bit.
    pub(crate) fn ulp_exponent(&self) -> i128 {
        i128::from(self.exp) - i128::from(self.prec)
    }

    /// Stores a value produced by the rounding engine at this precision.
    pub(crate) fn store(&mut self, rounded: Rounded) -> Ternary {
        self.sign = rounded.negative;
        match rounded.outcome {
            Outcome::Zero => self.kind = Kind::Zero,
            Outcome::Infinity => self.kind = Kind::Infinity,
            Outcome::Finite { exp, significand } => {
                self.kind = Kind::Normal;
                self.exp = exp;
                self.mantissa = Mantissa::from_significand(&significand, self.prec);
            }
        }
        rounded.ternary
    }
}

impl Default for Float {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Float");
        s.field("sign", if self.sign { &'-' } else { &'+' })
            .field("kind", &self.kind)
            .field("prec", &self.prec);
        if self.is_normal() {
            s.field("exp", &self.exp).field("mantissa", &self.mantissa);
        }
        s.finish()
    }
}
