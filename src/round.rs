//! # Rounding Engine
//!
//! Rounds exact intermediate results to a target precision.
//!
//! An intermediate result is a sign, an integer magnitude `m` held as a
//! [`BigUint`], a binary exponent `e` and a sticky flag: the exact value is
//! `±(m + δ) × 2^e` where `δ` is zero when the sticky flag is clear and lies
//! strictly between 0 and 1 otherwise. Rounding keeps the top `p` bits of
//! `m`, decides from the discarded bits whether to step the kept bits up by
//! one unit in the last place, and reports the direction of the change
//! through a [`Ternary`].
//!
//! Results whose exponent leaves [`EXP_MIN`, `EXP_MAX`] overflow to an
//! infinity or the largest finite value, or underflow to a zero or the
//! smallest positive value, depending on the mode.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::trace;

use crate::precision::{EXP_MAX, EXP_MIN, Exponent, Precision};

/// Direction applied when a result is not representable.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum RoundingMode {
    /// Round to nearest.
    ///
    /// - Under half an ulp rounds toward zero.
    /// - Over half an ulp rounds away from zero.
    /// - Exactly half an ulp rounds to the value with an even last bit.
    #[default]
    Nearest,
    /// Truncation.
    TowardZero,
    /// Toward positive infinity.
    ///
    /// AKA ceiling.
    Up,
    /// Toward negative infinity.
    ///
    /// AKA floor.
    Down,
    /// Away from zero, toward the infinity of the value's sign.
    Away,
}

impl RoundingMode {
    /// Reports whether an inexact magnitude is increased when the
    /// value has the given sign. Meaningless for [`Nearest`][Self::Nearest],
    /// which depends on the discarded bits.
    pub(crate) const fn is_away(self, negative: bool) -> bool {
        match self {
            Self::Nearest | Self::Away => true,
            Self::TowardZero => false,
            Self::Up => !negative,
            Self::Down => negative,
        }
    }
}

/// Where a rounded result lies relative to the exact one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Ternary {
    /// The rounded value is below the exact value.
    Less,
    /// No rounding took place.
    Exact,
    /// The rounded value is above the exact value.
    Greater,
}

impl Ternary {
    /// Builds the status of a rounding that did (or did not) increase the
    /// magnitude of an inexact value with the given sign.
    pub(crate) const fn from_magnitude(increased: bool, negative: bool) -> Self {
        if increased != negative {
            Self::Greater
        } else {
            Self::Less
        }
    }

    /// Reports whether the magnitude of an inexact value of the given sign
    /// was decreased.
    pub(crate) const fn magnitude_decreased(self, negative: bool) -> bool {
        match self {
            Self::Exact => false,
            Self::Less => !negative,
            Self::Greater => negative,
        }
    }

    /// The status of the negated operation.
    pub const fn reverse(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::Exact => Self::Exact,
            Self::Greater => Self::Less,
        }
    }

    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exact)
    }

    /// The C convention: negative, zero or positive.
    pub const fn to_i32(self) -> i32 {
        match self {
            Self::Less => -1,
            Self::Exact => 0,
            Self::Greater => 1,
        }
    }
}

impl From<Ternary> for Ordering {
    fn from(value: Ternary) -> Self {
        match value {
            Ternary::Less => Ordering::Less,
            Ternary::Exact => Ordering::Equal,
            Ternary::Greater => Ordering::Greater,
        }
    }
}

impl From<Ordering> for Ternary {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::Less => Ternary::Less,
            Ordering::Equal => Ternary::Exact,
            Ordering::Greater => Ternary::Greater,
        }
    }
}

/// How ties are broken when rounding to nearest.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Ties {
    Even,
    Away,
}

/// Drops the `shift` low bits of `m` and rounds what is left.
///
/// `sticky` flags a non-zero tail below the last bit of `m` and is only
/// allowed when `shift > 0`. Returns the
/// kept integer, possibly one unit larger than `m >> shift`, and the status.
pub(crate) fn round_shifted(
    negative: bool,
    m: &BigUint,
    shift: u64,
    sticky: bool,
    rnd: RoundingMode,
    ties: Ties,
) -> (BigUint, Ternary) {
    if shift == 0 {
        debug_assert!(!sticky, "sticky tail needs a round bit");
        return (m.clone(), Ternary::Exact);
    }

    let kept = m >> shift;
    let round_bit = m.bit(shift - 1);
    let sticky = sticky || m.trailing_zeros().is_some_and(|tz| tz < shift - 1);
    if !round_bit && !sticky {
        return (kept, Ternary::Exact);
    }

    let up = match rnd {
        RoundingMode::Nearest => {
            round_bit
                && (sticky
                    || match ties {
                        Ties::Even => kept.bit(0),
                        Ties::Away => true,
                    })
        }
        _ => rnd.is_away(negative),
    };
    let kept = if up { kept + 1u8 } else { kept };
    (kept, Ternary::from_magnitude(up, negative))
}

/// A value produced by the rounding engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Outcome {
    Zero,
    Infinity,
    /// `significand` has exactly the target precision in bits and the value
    /// is `0.significand × 2^exp`.
    Finite {
        exp: Exponent,
        significand: BigUint,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Rounded {
    pub negative: bool,
    pub outcome: Outcome,
    pub ternary: Ternary,
}

impl Rounded {
    pub(crate) const fn zero(negative: bool) -> Self {
        Self {
            negative,
            outcome: Outcome::Zero,
            ternary: Ternary::Exact,
        }
    }

    pub(crate) const fn infinity(negative: bool) -> Self {
        Self {
            negative,
            outcome: Outcome::Infinity,
            ternary: Ternary::Exact,
        }
    }
}

/// Rounds `±(m + δ) × 2^e` to `prec` bits.
///
/// When `sticky` is set, `m` must have at least `prec + 1` bits so that the
/// tail only ever affects bits below the rounding position.
pub(crate) fn round_exact(
    negative: bool,
    m: &BigUint,
    e: i128,
    sticky: bool,
    prec: Precision,
    rnd: RoundingMode,
) -> Rounded {
    if m.is_zero() {
        debug_assert!(!sticky, "sticky tail without magnitude");
        return Rounded::zero(negative);
    }

    let bits = m.bits();
    let (mut significand, ternary, mut e) = if bits > prec {
        let shift = bits - prec;
        let (kept, ternary) = round_shifted(negative, m, shift, sticky, rnd, Ties::Even);
        (kept, ternary, e + i128::from(shift))
    } else {
        debug_assert!(!sticky, "sticky tail needs guard bits");
        let pad = prec - bits;
        (m << pad, Ternary::Exact, e - i128::from(pad))
    };
    if significand.bits() > prec {
        // Carry out of the top bit: the significand is a power of two.
        significand >>= 1u8;
        e += 1;
    }

    let exp = e + i128::from(prec);
    if exp > i128::from(EXP_MAX) {
        return overflow(negative, prec, rnd);
    }
    if exp < i128::from(EXP_MIN) {
        return underflow(negative, prec, rnd, exp, &significand, ternary);
    }
    Rounded {
        negative,
        outcome: Outcome::Finite {
            exp: exp as Exponent,
            significand,
        },
        ternary,
    }
}

/// Largest significand at the given precision.
pub(crate) fn max_significand(prec: Precision) -> BigUint {
    (BigUint::one() << prec) - 1u8
}

/// Significand of the power of two `0.1b × 2^exp`.
pub(crate) fn min_significand(prec: Precision) -> BigUint {
    BigUint::one() << (prec - 1)
}

fn overflow(negative: bool, prec: Precision, rnd: RoundingMode) -> Rounded {
    trace!(negative, ?rnd, "exponent overflow");
    if rnd.is_away(negative) {
        Rounded {
            negative,
            outcome: Outcome::Infinity,
            ternary: Ternary::from_magnitude(true, negative),
        }
    } else {
        Rounded {
            negative,
            outcome: Outcome::Finite {
                exp: EXP_MAX,
                significand: max_significand(prec),
            },
            ternary: Ternary::from_magnitude(false, negative),
        }
    }
}

/// `exp` and `significand` are the rounded result, `ternary` its status
/// relative to the exact value.
fn underflow(
    negative: bool,
    prec: Precision,
    rnd: RoundingMode,
    exp: i128,
    significand: &BigUint,
    ternary: Ternary,
) -> Rounded {
    trace!(negative, ?rnd, "exponent underflow");
    let to_min = match rnd {
        // Half of the smallest value goes to zero.
        RoundingMode::Nearest => {
            exp == i128::from(EXP_MIN) - 1 && {
                let half = min_significand(prec);
                match significand.cmp(&half) {
                    Ordering::Greater => true,
                    Ordering::Equal => ternary.magnitude_decreased(negative),
                    Ordering::Less => false,
                }
            }
        }
        _ => rnd.is_away(negative),
    };
    if to_min {
        Rounded {
            negative,
            outcome: Outcome::Finite {
                exp: EXP_MIN,
                significand: min_significand(prec),
            },
            ternary: Ternary::from_magnitude(true, negative),
        }
    } else {
        Rounded {
            negative,
            outcome: Outcome::Zero,
            ternary: Ternary::from_magnitude(false, negative),
        }
    }
}
