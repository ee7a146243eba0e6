use std::fmt;

use num_bigint::BigUint;

use crate::precision::Precision;

pub mod limbs;

pub use limbs::{LIMB_BITS, LIMB_HIGH_BIT, Limb, limbs_for, padding_for};

/// Significand storage: the minimum number of limbs covering the precision,
/// least significant limb first.
///
/// The `p` significant bits are left-aligned: the most significant bit of
/// the top limb is the leading bit of the significand and the unused low
/// bits of the bottom limb are always zero. A normalized mantissa has its
/// leading bit set.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Mantissa {
    limbs: Vec<Limb>,
}

impl Mantissa {
    /// Allocates a zeroed mantissa for `prec` bits.
    pub fn zeros(prec: Precision) -> Self {
        Self {
            limbs: vec![0; limbs_for(prec)],
        }
    }

    /// Builds the mantissa of a `prec`-bit significand.
    ///
    /// Bits of `significand` above the top limb are discarded.
    pub fn from_significand(significand: &BigUint, prec: Precision) -> Self {
        let n_limbs = limbs_for(prec);
        let aligned = significand << padding_for(prec);
        debug_assert!(
            aligned.bits() <= n_limbs as u64 * LIMB_BITS,
            "significand wider than precision"
        );
        Self {
            limbs: limbs::from_biguint(&aligned, n_limbs),
        }
    }

    /// Returns the `prec`-bit significand as an integer.
    pub fn to_significand(&self, prec: Precision) -> BigUint {
        limbs::to_biguint(&self.limbs) >> padding_for(prec)
    }

    /// Least significant limb first.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Reports whether the leading bit is set.
    pub fn is_normalized(&self) -> bool {
        self.limbs
            .last()
            .is_some_and(|top| top & LIMB_HIGH_BIT != 0)
    }

    /// Reports whether every bit below the top `prec` bits is zero.
    pub fn is_trimmed(&self, prec: Precision) -> bool {
        let pad = padding_for(prec);
        self.limbs
            .first()
            .is_none_or(|low| low & !limbs::high_mask(LIMB_BITS - pad) == 0)
    }

    /// Bits from the most significant down, as a string of `0`s and `1`s.
    pub fn to_bits_string(&self) -> String {
        self.limbs
            .iter()
            .rev()
            .map(|limb| format!("{limb:064b}"))
            .collect()
    }
}

impl fmt::Debug for Mantissa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.limbs.iter().rev().map(|limb| format!("{limb:#018x}")))
            .finish()
    }
}
