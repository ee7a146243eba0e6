use num_bigint::BigUint;

use crate::precision::Precision;

/// One machine word of a significand.
pub type Limb = u64;

/// Size of a limb in bits.
pub const LIMB_BITS: u64 = Limb::BITS as u64;

/// Limb with only the most significant bit set.
pub const LIMB_HIGH_BIT: Limb = 1 << (LIMB_BITS - 1);

/// Minimum number of limbs holding `prec` bits.
pub const fn limbs_for(prec: Precision) -> usize {
    prec.div_ceil(LIMB_BITS) as usize
}

/// Number of unused low bits when `prec` bits are stored left-aligned.
pub const fn padding_for(prec: Precision) -> u64 {
    limbs_for(prec) as u64 * LIMB_BITS - prec
}

/// The low `n_limbs` limbs of `value`, least significant first,
/// zero-filled when `value` is shorter.
pub fn from_biguint(value: &BigUint, n_limbs: usize) -> Vec<Limb> {
    let mut limbs: Vec<Limb> = value.iter_u64_digits().take(n_limbs).collect();
    limbs.resize(n_limbs, 0);
    limbs
}

/// The integer whose limbs, least significant first, are `limbs`.
pub fn to_biguint(limbs: &[Limb]) -> BigUint {
    BigUint::new(
        limbs
            .iter()
            .flat_map(|&limb| [limb as u32, (limb >> 32) as u32])
            .collect(),
    )
}

/// Mask keeping the `n_bits` most significant bits of a limb.
pub const fn high_mask(n_bits: u64) -> Limb {
    match n_bits {
        0 => 0,
        n if n >= LIMB_BITS => Limb::MAX,
        n => !(Limb::MAX >> n),
    }
}
