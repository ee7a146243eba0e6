//! # Assignment
//!
//! Copying values between precisions and the create-then-assign family.
//!
//! Every `new_set*` constructor allocates at the process-wide default
//! precision and returns the new value together with the status of the
//! assignment, so callers never observe an unassigned value.

use tracing::trace;

use crate::config;
use crate::error::Error;
use crate::float::{Float, Kind};
use crate::mantissa::Mantissa;
use crate::precision::{Precision, check_precision};
use crate::round::{Rounded, RoundingMode, Ternary, round_exact};

impl Float {
    /// Assigns `op`, rounded to this value's precision.
    pub fn set(&mut self, op: &Float, rnd: RoundingMode) -> Ternary {
        match op.kind {
            Kind::Nan => {
                self.set_nan();
                Ternary::Exact
            }
            Kind::Infinity => self.store(Rounded::infinity(op.sign)),
            Kind::Zero => self.store(Rounded::zero(op.sign)),
            Kind::Normal => {
                let rounded = round_exact(
                    op.sign,
                    &op.significand(),
                    op.ulp_exponent(),
                    false,
                    self.prec,
                    rnd,
                );
                self.store(rounded)
            }
        }
    }

    /// Changes the precision to `prec`, rounding the current value into it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPrecision`] leaves the value untouched.
    pub fn prec_round(&mut self, prec: Precision, rnd: RoundingMode) -> Result<Ternary, Error> {
        let prec = check_precision(prec)?;
        trace!(from = self.prec, to = prec, "rounding to new precision");
        let old = self.clone();
        self.prec = prec;
        self.mantissa = Mantissa::zeros(prec);
        Ok(self.set(&old, rnd))
    }

    /// Creates a value at the default precision holding `op` rounded.
    pub fn new_set(op: &Float, rnd: RoundingMode) -> (Self, Ternary) {
        let mut value = Self::new_unchecked(config::default_precision());
        let ternary = value.set(op, rnd);
        (value, ternary)
    }

    /// Creates a value at the default precision holding `op` rounded.
    pub fn new_set_i64(op: i64, rnd: RoundingMode) -> (Self, Ternary) {
        let mut value = Self::new_unchecked(config::default_precision());
        let ternary = value.set_i64(op, rnd);
        (value, ternary)
    }

    /// Creates a value at the default precision holding `op` rounded.
    pub fn new_set_f64(op: f64, rnd: RoundingMode) -> (Self, Ternary) {
        let mut value = Self::new_unchecked(config::default_precision());
        let ternary = value.set_f64(op, rnd);
        (value, ternary)
    }

    /// Creates a value at the default precision from a numeral in `base`.
    ///
    /// # Errors
    ///
    /// Same as [`set_str`][Self::set_str]; nothing is allocated on failure.
    pub fn new_set_str(text: &str, base: u32, rnd: RoundingMode) -> Result<(Self, Ternary), Error> {
        let mut value = Self::new_unchecked(config::default_precision());
        let ternary = value.set_str(text, base, rnd)?;
        Ok((value, ternary))
    }
}
