//! # Arithmetic
//!
//! Correctly rounded addition, subtraction, multiplication and division.
//!
//! Each `assign_*` method computes the exact result of its operands as an
//! integer scaled by a power of two (with a sticky flag standing in for an
//! infinite tail where needed) and rounds it once into the destination's
//! precision. Special values follow IEEE 754: `∞ - ∞`, `0 × ∞`, `0 / 0` and
//! `∞ / ∞` are NaN, and an exact zero sum is `+0` except when rounding down.
//!
//! The `std::ops` implementations work on references, produce a value at
//! the larger operand precision and round with the process-wide default
//! mode.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use tracing::trace;

use crate::config;
use crate::float::{Float, Kind};
use crate::round::{Rounded, RoundingMode, Ternary, round_exact};

impl Float {
    /// Returns the absolute value, at the same precision.
    pub fn abs(&self) -> Self {
        let mut value = self.clone();
        if !value.is_nan() {
            value.sign = false;
        }
        value
    }

    /// Flips the sign in place. NaN stays NaN.
    pub fn neg_assign(&mut self) {
        if !self.is_nan() {
            self.sign = !self.sign;
        }
    }

    /// Rounds `op` with its sign replaced by `negative`.
    fn set_signed(&mut self, op: &Float, negative: bool, rnd: RoundingMode) -> Ternary {
        let rounded = round_exact(
            negative,
            &op.significand(),
            op.ulp_exponent(),
            false,
            self.prec,
            rnd,
        );
        self.store(rounded)
    }

    /// `self = a + (±b)`, with `b_negative` the sign used for `b`.
    fn add_signed(&mut self, a: &Float, b: &Float, b_negative: bool, rnd: RoundingMode) -> Ternary {
        let a_negative = a.sign;
        match (a.kind, b.kind) {
            (Kind::Nan, _) | (_, Kind::Nan) => {
                self.set_nan();
                Ternary::Exact
            }
            (Kind::Infinity, Kind::Infinity) => {
                if a_negative == b_negative {
                    self.store(Rounded::infinity(a_negative))
                } else {
                    self.set_nan();
                    Ternary::Exact
                }
            }
            (Kind::Infinity, _) => self.store(Rounded::infinity(a_negative)),
            (_, Kind::Infinity) => self.store(Rounded::infinity(b_negative)),
            (Kind::Zero, Kind::Zero) => {
                let negative = if a_negative == b_negative {
                    a_negative
                } else {
                    rnd == RoundingMode::Down
                };
                self.store(Rounded::zero(negative))
            }
            (Kind::Zero, Kind::Normal) => self.set_signed(b, b_negative, rnd),
            (Kind::Normal, Kind::Zero) => self.set_signed(a, a_negative, rnd),
            (Kind::Normal, Kind::Normal) => {
                let rounded = if a.exp >= b.exp {
                    add_normal(a, a_negative, b, b_negative, self.prec, rnd)
                } else {
                    add_normal(b, b_negative, a, a_negative, self.prec, rnd)
                };
                self.store(rounded)
            }
        }
    }

    /// `self = a + b`, rounded to this value's precision.
    pub fn assign_add(&mut self, a: &Float, b: &Float, rnd: RoundingMode) -> Ternary {
        self.add_signed(a, b, b.sign, rnd)
    }

    /// `self = a - b`, rounded to this value's precision.
    pub fn assign_sub(&mut self, a: &Float, b: &Float, rnd: RoundingMode) -> Ternary {
        self.add_signed(a, b, !b.sign, rnd)
    }

    /// `self = a × b`, rounded to this value's precision.
    pub fn assign_mul(&mut self, a: &Float, b: &Float, rnd: RoundingMode) -> Ternary {
        let negative = a.sign != b.sign;
        match (a.kind, b.kind) {
            (Kind::Nan, _) | (_, Kind::Nan) => {
                self.set_nan();
                Ternary::Exact
            }
            (Kind::Infinity, Kind::Zero) | (Kind::Zero, Kind::Infinity) => {
                self.set_nan();
                Ternary::Exact
            }
            (Kind::Infinity, _) | (_, Kind::Infinity) => self.store(Rounded::infinity(negative)),
            (Kind::Zero, _) | (_, Kind::Zero) => self.store(Rounded::zero(negative)),
            (Kind::Normal, Kind::Normal) => {
                let m = a.significand() * b.significand();
                let e = a.ulp_exponent() + b.ulp_exponent();
                self.store(round_exact(negative, &m, e, false, self.prec, rnd))
            }
        }
    }

    /// `self = a / b`, rounded to this value's precision.
    ///
    /// A non-zero finite value divided by zero is an infinity with the
    /// sign of the quotient.
    pub fn assign_div(&mut self, a: &Float, b: &Float, rnd: RoundingMode) -> Ternary {
        let negative = a.sign != b.sign;
        match (a.kind, b.kind) {
            (Kind::Nan, _)
            | (_, Kind::Nan)
            | (Kind::Infinity, Kind::Infinity)
            | (Kind::Zero, Kind::Zero) => {
                self.set_nan();
                Ternary::Exact
            }
            (Kind::Infinity, _) => self.store(Rounded::infinity(negative)),
            (_, Kind::Infinity) | (Kind::Zero, _) => self.store(Rounded::zero(negative)),
            (Kind::Normal, Kind::Zero) => {
                trace!(negative, "division by zero");
                self.store(Rounded::infinity(negative))
            }
            (Kind::Normal, Kind::Normal) => {
                let ma = a.significand();
                let mb = b.significand();
                // At least prec + 2 quotient bits, so the remainder only
                // ever feeds the sticky flag.
                let shift = (self.prec + 2 + mb.bits()).saturating_sub(ma.bits());
                let (q, r) = (ma << shift).div_rem(&mb);
                let e = a.ulp_exponent() - i128::from(shift) - b.ulp_exponent();
                self.store(round_exact(negative, &q, e, !r.is_zero(), self.prec, rnd))
            }
        }
    }

    /// Multiplies by `2^n` in place. Only overflow or underflow can make
    /// the result inexact.
    pub fn mul_2si(&mut self, n: i64, rnd: RoundingMode) -> Ternary {
        if !self.is_normal() {
            return Ternary::Exact;
        }
        let rounded = round_exact(
            self.sign,
            &self.significand(),
            self.ulp_exponent() + i128::from(n),
            false,
            self.prec,
            rnd,
        );
        self.store(rounded)
    }
}

/// Adds two finite non-zero values where `large.exp >= small.exp`.
fn add_normal(
    large: &Float,
    large_negative: bool,
    small: &Float,
    small_negative: bool,
    prec: u64,
    rnd: RoundingMode,
) -> Rounded {
    let large_ulp = large.ulp_exponent();
    let small_ulp = small.ulp_exponent();
    // Working position keeping at least prec + 2 bits of the large operand.
    let work = large_ulp.min(i128::from(large.exp) - i128::from(prec) - 2);

    if i128::from(small.exp) < work {
        // |small| < 2^work: it only decides the direction of the tail.
        let m = large.significand() << ((large_ulp - work) as u64);
        let m = if large_negative == small_negative {
            m
        } else {
            m - 1u8
        };
        return round_exact(large_negative, &m, work, true, prec, rnd);
    }

    let e = large_ulp.min(small_ulp);
    let a = large.significand() << ((large_ulp - e) as u64);
    let b = small.significand() << ((small_ulp - e) as u64);
    if large_negative == small_negative {
        return round_exact(large_negative, &(a + b), e, false, prec, rnd);
    }
    let (negative, m): (bool, BigUint) = match a.cmp(&b) {
        Ordering::Greater => (large_negative, a - b),
        Ordering::Less => (small_negative, b - a),
        Ordering::Equal => return Rounded::zero(rnd == RoundingMode::Down),
    };
    round_exact(negative, &m, e, false, prec, rnd)
}

fn result_for(a: &Float, b: &Float) -> Float {
    Float::new_unchecked(a.prec.max(b.prec))
}

impl Add for &Float {
    type Output = Float;

    fn add(self, rhs: Self) -> Float {
        let mut result = result_for(self, rhs);
        result.assign_add(self, rhs, config::default_rounding_mode());
        result
    }
}

impl Sub for &Float {
    type Output = Float;

    fn sub(self, rhs: Self) -> Float {
        let mut result = result_for(self, rhs);
        result.assign_sub(self, rhs, config::default_rounding_mode());
        result
    }
}

impl Mul for &Float {
    type Output = Float;

    fn mul(self, rhs: Self) -> Float {
        let mut result = result_for(self, rhs);
        result.assign_mul(self, rhs, config::default_rounding_mode());
        result
    }
}

impl Div for &Float {
    type Output = Float;

    fn div(self, rhs: Self) -> Float {
        let mut result = result_for(self, rhs);
        result.assign_div(self, rhs, config::default_rounding_mode());
        result
    }
}

impl Neg for Float {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.neg_assign();
        self
    }
}

impl Neg for &Float {
    type Output = Float;

    fn neg(self) -> Float {
        -self.clone()
    }
}
