//! # Radix Helpers
//!
//! Digit tables and scaled powers shared by parsing and printing.
//!
//! Powers of a base that is not a power of two are computed with bounded
//! precision: [`pow_bounds`] returns a lower and an upper bound of `b^n`,
//! each truncated to a working number of bits. A conversion rounds the
//! result built from both bounds and accepts it once both agree, doubling
//! the working precision otherwise. Once the working precision covers the
//! whole power the bounds coincide, so the loop always ends.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::round::{RoundingMode, Ternary};

pub(crate) const MIN_BASE: u32 = 2;
pub(crate) const MAX_BASE: u32 = 62;

const LOWER_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MIXED_DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Value of an ASCII digit in `base`.
///
/// Letters are case-insensitive up to base 36; above it `A-Z` are 10..35 and
/// `a-z` are 36..61.
pub(crate) fn digit_value(byte: u8, base: u32) -> Option<u8> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'A'..=b'Z' => byte - b'A' + 10,
        b'a'..=b'z' if base <= 36 => byte - b'a' + 10,
        b'a'..=b'z' => byte - b'a' + 36,
        _ => return None,
    };
    (u32::from(value) < base).then_some(value)
}

pub(crate) fn digit_char(value: u8, base: u32) -> char {
    if base <= 36 {
        char::from(LOWER_DIGITS[usize::from(value)])
    } else {
        char::from(MIXED_DIGITS[usize::from(value)])
    }
}

/// `k` for a base `2^k`.
pub(crate) fn power_of_two_log(base: u32) -> Option<u32> {
    base.is_power_of_two().then(|| base.trailing_zeros())
}

/// A non-negative value `m × 2^e`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Scaled {
    pub m: BigUint,
    pub e: i128,
}

impl Scaled {
    pub(crate) fn integer(m: BigUint) -> Self {
        Self { m, e: 0 }
    }

    pub(crate) fn mul(&self, other: &Self) -> Self {
        Self {
            m: &self.m * &other.m,
            e: self.e + other.e,
        }
    }

    /// Keeps the top `bits` bits, rounding the dropped ones down or up.
    fn truncate(self, bits: u64, up: bool) -> Self {
        let len = self.m.bits();
        if len <= bits {
            return self;
        }
        let shift = len - bits;
        let inexact = self.m.trailing_zeros().is_some_and(|tz| tz < shift);
        let mut m = self.m >> shift;
        if up && inexact {
            m += 1u8;
        }
        Self {
            m,
            e: self.e + i128::from(shift),
        }
    }
}

/// Lower and upper bounds of `base^n`, computed by squaring with every
/// intermediate kept to `bits` bits.
///
/// Both bounds are exact once `bits` covers `base^n`.
pub(crate) fn pow_bounds(base: u32, mut n: u128, bits: u64) -> (Scaled, Scaled) {
    let mut lo = Scaled::integer(BigUint::one());
    let mut hi = lo.clone();
    let mut sq_lo = Scaled::integer(BigUint::from(base));
    let mut sq_hi = sq_lo.clone();
    while n > 0 {
        if n & 1 == 1 {
            lo = lo.mul(&sq_lo).truncate(bits, false);
            hi = hi.mul(&sq_hi).truncate(bits, true);
        }
        n >>= 1;
        if n > 0 {
            sq_lo = sq_lo.mul(&sq_lo).truncate(bits, false);
            sq_hi = sq_hi.mul(&sq_hi).truncate(bits, true);
        }
    }
    (lo, hi)
}

/// Rounds `num / den` to an integer magnitude, for a value of the given
/// sign, ties to even.
pub(crate) fn round_ratio(
    negative: bool,
    num: &Scaled,
    den: &Scaled,
    rnd: RoundingMode,
) -> (BigUint, Ternary) {
    let d = num.e - den.e;
    let (n, q) = if d >= 0 {
        (&num.m << (d as u64), den.m.clone())
    } else {
        (num.m.clone(), &den.m << (d.unsigned_abs() as u64))
    };
    let (quot, rem) = n.div_rem(&q);
    if rem.is_zero() {
        return (quot, Ternary::Exact);
    }
    let up = match rnd {
        RoundingMode::Nearest => match (rem << 1u8).cmp(&q) {
            Ordering::Greater => true,
            Ordering::Equal => quot.bit(0),
            Ordering::Less => false,
        },
        _ => rnd.is_away(negative),
    };
    let quot = if up { quot + 1u8 } else { quot };
    (quot, Ternary::from_magnitude(up, negative))
}

/// `num / den` as an integer with at least `bits` bits plus a flag for a
/// non-zero remainder.
pub(crate) fn div_sticky(num: &BigUint, den: &Scaled, bits: u64) -> (BigUint, i128, bool) {
    let shift = (bits + den.m.bits()).saturating_sub(num.bits());
    let (q, r) = (num << shift).div_rem(&den.m);
    (q, -i128::from(shift) - den.e, !r.is_zero())
}
