use num_bigint::BigUint;

use crate::float::{Float, Kind};
use crate::round::{Rounded, RoundingMode, Ternary, Ties, round_exact, round_shifted};

impl Float {
    /// Rounds a finite non-zero value to an integer magnitude.
    ///
    /// The magnitude is built in full, so callers must bound the exponent
    /// first when the value may be huge.
    pub(crate) fn round_integer(&self, rnd: RoundingMode, ties: Ties) -> (BigUint, Ternary) {
        debug_assert!(self.is_normal());
        let e = self.ulp_exponent();
        let significand = self.significand();
        if e >= 0 {
            return (significand << (e as u64), Ternary::Exact);
        }
        round_shifted(self.sign, &significand, e.unsigned_abs() as u64, false, rnd, ties)
    }

    fn rint_with(&mut self, rnd: RoundingMode, ties: Ties) -> Ternary {
        if self.kind != Kind::Normal || self.ulp_exponent() >= 0 {
            return Ternary::Exact;
        }
        let (magnitude, ternary) = self.round_integer(rnd, ties);
        // Integers up to 2^prec fit, so storing them back is exact.
        let rounded = round_exact(self.sign, &magnitude, 0, false, self.prec, rnd);
        self.store(Rounded { ternary, ..rounded });
        ternary
    }

    /// Rounds to an integer in the given direction, in place.
    ///
    /// Tiny values keep their sign when rounded to zero.
    pub fn rint(&mut self, rnd: RoundingMode) -> Ternary {
        self.rint_with(rnd, Ties::Even)
    }

    /// Rounds toward positive infinity.
    pub fn ceil(&mut self) -> Ternary {
        self.rint_with(RoundingMode::Up, Ties::Even)
    }

    /// Rounds toward negative infinity.
    pub fn floor(&mut self) -> Ternary {
        self.rint_with(RoundingMode::Down, Ties::Even)
    }

    /// Rounds toward zero.
    pub fn trunc(&mut self) -> Ternary {
        self.rint_with(RoundingMode::TowardZero, Ties::Even)
    }

    /// Rounds to the nearest integer, ties away from zero.
    pub fn round(&mut self) -> Ternary {
        self.rint_with(RoundingMode::Nearest, Ties::Away)
    }
}
