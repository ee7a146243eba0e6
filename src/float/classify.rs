use num_bigint::BigUint;
use num_traits::One;

use crate::float::{Float, Kind};
use crate::round::{RoundingMode, Ties};

impl Float {
    /// Reports whether the value rounded to an integer under `rnd` lies in
    /// `[-2^(width-1), 2^(width-1) - 1]`.
    fn fits_signed(&self, width: u32, rnd: RoundingMode) -> bool {
        match self.kind {
            Kind::Nan | Kind::Infinity => false,
            Kind::Zero => true,
            Kind::Normal => {
                // At least 2^width in magnitude.
                if self.exp > i64::from(width) {
                    return false;
                }
                let (magnitude, _) = self.round_integer(rnd, Ties::Even);
                let half = BigUint::one() << (width - 1);
                if self.sign {
                    magnitude <= half
                } else {
                    magnitude < half
                }
            }
        }
    }

    /// Reports whether rounding under `rnd` gives a value that fits a C `int`.
    pub fn fits_i32(&self, rnd: RoundingMode) -> bool {
        self.fits_signed(i32::BITS, rnd)
    }

    /// Reports whether rounding under `rnd` gives a value that fits a C `long`.
    pub fn fits_i64(&self, rnd: RoundingMode) -> bool {
        self.fits_signed(i64::BITS, rnd)
    }

    /// Reports whether the value is a finite integer.
    pub fn is_integer(&self) -> bool {
        match self.kind {
            Kind::Zero => true,
            Kind::Nan | Kind::Infinity => false,
            Kind::Normal => {
                let e = self.ulp_exponent();
                e >= 0
                    || self
                        .significand()
                        .trailing_zeros()
                        .is_some_and(|tz| i128::from(tz) >= -e)
            }
        }
    }
}
