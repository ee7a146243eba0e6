//! # String Conversion
//!
//! Parsing numerals in bases 2 to 62 and printing significant digits.
//!
//! ## Accepted Syntax
//!
//! ```text
//! [whitespace][+|-](special | [prefix]digits[.digits][exponent])
//! special  = @nan@ | @inf@                  any base
//!          | nan[(tag)] | inf | infinity     base <= 16, case-insensitive
//! prefix   = 0x | 0b                         base 0 or the matching base
//! exponent = (e|E) [+|-] decimal             base <= 10, power of the base
//!          | @ [+|-] decimal                 any base, power of the base
//!          | (p|P) [+|-] decimal             base 2 or 16, power of two
//! ```
//!
//! Base 0 picks 16 or 2 from a prefix and 10 otherwise. Digits above 9 are
//! letters, case-insensitive up to base 36; above it `A-Z` come before
//! `a-z`.
//!
//! ## Printing
//!
//! [`Float::to_digits`] returns the significand digits and an exponent `E`
//! such that the value is `d.ddd × base^E`. Asking for zero digits returns
//! enough of them to read the value back exactly.
//!
//! ```rust
//! use mpfloat::{Float, RoundingMode};
//!
//! let mut x = Float::with_precision(53).unwrap();
//! x.set_str("-1.5e3", 10, RoundingMode::Nearest).unwrap();
//! assert_eq!(x.to_digits(10, 4, RoundingMode::Nearest).unwrap(), ("-1500".to_string(), 3));
//! assert_eq!(x.to_string(), "-1.5e3");
//! ```

use std::f64::consts::LOG10_2;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use crate::config::{self, Config};
use crate::error::{Error, ParseError};
use crate::float::{Float, Kind};
use crate::precision::{EXP_MAX, EXP_MIN, Exponent, Precision};
use crate::radix::{self, MAX_BASE, MIN_BASE, Scaled};
use crate::round::{Rounded, RoundingMode, Ternary, round_exact};

/// Largest significant-digit count [`Float::to_digits`] accepts.
pub const MAX_DIGITS: usize = i32::MAX as usize;

/// A parsed numeral before rounding.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Literal {
    Nan,
    Infinity {
        negative: bool,
    },
    /// `±digits × base^scale × 2^binary_scale`.
    Finite {
        negative: bool,
        base: u32,
        digits: BigUint,
        scale: i128,
        binary_scale: i128,
    },
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat_sign(&mut self) -> bool {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        }
    }

    fn eat_ignore_case(&mut self, word: &str) -> bool {
        let end = self.pos + word.len();
        match self.bytes.get(self.pos..end) {
            Some(slice) if slice.eq_ignore_ascii_case(word.as_bytes()) => {
                self.pos = end;
                true
            }
            _ => false,
        }
    }

    fn special(&mut self, negative: bool, base: u32) -> Option<Literal> {
        if self.eat_ignore_case("@nan@") {
            return Some(Literal::Nan);
        }
        if self.eat_ignore_case("@inf@") {
            return Some(Literal::Infinity { negative });
        }
        // Above 16 these letters are digits.
        if base > 16 {
            return None;
        }
        if self.eat_ignore_case("nan") {
            self.nan_tag();
            return Some(Literal::Nan);
        }
        if self.eat_ignore_case("infinity") || self.eat_ignore_case("inf") {
            return Some(Literal::Infinity { negative });
        }
        None
    }

    /// Skips a `(tag)` after `nan`, only when it is well formed.
    fn nan_tag(&mut self) {
        if self.peek() != Some(b'(') {
            return;
        }
        let mut pos = self.pos + 1;
        while self
            .bytes
            .get(pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            pos += 1;
        }
        if self.bytes.get(pos) == Some(&b')') {
            self.pos = pos + 1;
        }
    }

    /// Consumes a `0x`/`0b` prefix when allowed and returns the base to
    /// read digits in.
    fn prefix(&mut self, base: u32) -> u32 {
        let fallback = if base == 0 { 10 } else { base };
        let detected = match (self.peek(), self.peek_at(1)) {
            (Some(b'0'), Some(b'x' | b'X')) if base == 0 || base == 16 => 16,
            (Some(b'0'), Some(b'b' | b'B')) if base == 0 || base == 2 => 2,
            _ => return fallback,
        };
        let digit_at = |offset| {
            self.peek_at(offset)
                .is_some_and(|b| radix::digit_value(b, detected).is_some())
        };
        // A bare prefix is the number 0 followed by garbage.
        if digit_at(2) || (self.peek_at(2) == Some(b'.') && digit_at(3)) {
            self.pos += 2;
            detected
        } else {
            fallback
        }
    }

    /// Reads an exponent suffix. A marker without digits is left alone.
    fn exponent(&mut self, base: u32) -> Option<(i128, bool)> {
        let binary = match self.peek()? {
            b'e' | b'E' if base <= 10 => false,
            b'@' => false,
            b'p' | b'P' if base == 2 || base == 16 => true,
            _ => return None,
        };
        let mut pos = self.pos + 1;
        let negative = match self.bytes.get(pos) {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let start = pos;
        let mut value: i64 = 0;
        while let Some(d) = self.bytes.get(pos).copied().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
            pos += 1;
        }
        if pos == start {
            return None;
        }
        self.pos = pos;
        let value = i128::from(value);
        Some((if negative { -value } else { value }, binary))
    }
}

/// Parses the longest valid numeral at the start of `text`.
///
/// Returns the literal and the number of bytes it spans, leading
/// whitespace included.
fn parse_literal(text: &str, base: u32) -> Result<(Literal, usize), Error> {
    if base != 0 && !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(Error::InvalidBase(base));
    }
    let mut cur = Cursor {
        bytes: text.as_bytes(),
        pos: 0,
    };
    while cur.peek().is_some_and(|b| b.is_ascii_whitespace()) {
        cur.pos += 1;
    }
    if cur.peek().is_none() {
        return Err(ParseError::empty().into());
    }
    let negative = cur.eat_sign();
    if let Some(special) = cur.special(negative, base) {
        return Ok((special, cur.pos));
    }

    let base = cur.prefix(base);
    let start = cur.pos;
    let mut values = Vec::new();
    let mut fraction_digits: i128 = 0;
    let mut seen_point = false;
    while let Some(byte) = cur.peek() {
        if byte == b'.' && !seen_point {
            seen_point = true;
        } else if let Some(value) = radix::digit_value(byte, base) {
            values.push(value);
            if seen_point {
                fraction_digits += 1;
            }
        } else {
            break;
        }
        cur.pos += 1;
    }
    if values.is_empty() {
        return Err(ParseError::invalid(start).into());
    }

    let mut scale = -fraction_digits;
    let mut binary_scale = 0;
    match cur.exponent(base) {
        Some((value, true)) => binary_scale = value,
        Some((value, false)) => scale += value,
        None => {}
    }
    let digits = BigUint::from_radix_be(&values, base).unwrap_or_default();
    let literal = Literal::Finite {
        negative,
        base,
        digits,
        scale,
        binary_scale,
    };
    Ok((literal, cur.pos))
}

fn round_product(
    negative: bool,
    digits: &BigUint,
    power: &Scaled,
    binary_scale: i128,
    prec: Precision,
    rnd: RoundingMode,
) -> Rounded {
    let m = digits * &power.m;
    round_exact(negative, &m, power.e + binary_scale, false, prec, rnd)
}

fn round_quotient(
    negative: bool,
    digits: &BigUint,
    power: &Scaled,
    binary_scale: i128,
    prec: Precision,
    rnd: RoundingMode,
) -> Rounded {
    let (q, e, sticky) = radix::div_sticky(digits, power, prec + 2);
    round_exact(negative, &q, e + binary_scale, sticky, prec, rnd)
}

/// Rounds `±digits × base^scale × 2^binary_scale` to `prec` bits.
fn round_literal(
    negative: bool,
    base: u32,
    digits: &BigUint,
    scale: i128,
    binary_scale: i128,
    prec: Precision,
    rnd: RoundingMode,
) -> Rounded {
    if digits.is_zero() {
        return Rounded::zero(negative);
    }
    if let Some(log) = radix::power_of_two_log(base) {
        let e = i128::from(log) * scale + binary_scale;
        return round_exact(negative, digits, e, false, prec, rnd);
    }

    // Far outside the exponent range: any value there rounds the same way.
    let bits = i128::from(digits.bits());
    let floor_log = i128::from(base.ilog2());
    if scale >= 0 && bits - 1 + scale * floor_log + binary_scale >= i128::from(EXP_MAX) {
        return round_exact(negative, &BigUint::one(), i128::from(EXP_MAX), false, prec, rnd);
    }
    if scale < 0 && bits + scale * floor_log + binary_scale < i128::from(EXP_MIN) - 2 {
        let e = i128::from(EXP_MIN) - 3;
        return round_exact(negative, &BigUint::one(), e, false, prec, rnd);
    }

    let n = scale.unsigned_abs();
    let mut work = prec + 64;
    loop {
        let (lo, hi) = radix::pow_bounds(base, n, work);
        let (below, above) = if scale >= 0 {
            (
                round_product(negative, digits, &lo, binary_scale, prec, rnd),
                round_product(negative, digits, &hi, binary_scale, prec, rnd),
            )
        } else {
            (
                round_quotient(negative, digits, &hi, binary_scale, prec, rnd),
                round_quotient(negative, digits, &lo, binary_scale, prec, rnd),
            )
        };
        if below == above {
            return below;
        }
        work = work.saturating_mul(2);
    }
}

/// Digits needed to read a `prec`-bit value back exactly.
fn round_trip_digits(prec: Precision, base: u32) -> usize {
    match radix::power_of_two_log(base) {
        Some(k) => 1 + (prec - 1).div_ceil(u64::from(k)) as usize,
        None => 1 + (prec as f64 / f64::from(base).log2()).ceil() as usize,
    }
}

/// Formats `[-]ddd` digits as `[-]d.ddd` followed by `marker` and the
/// exponent when it is non-zero.
fn scientific(digits: &str, exp: Exponent, marker: char, trim: bool) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let digits = if trim {
        digits.trim_end_matches('0')
    } else {
        digits
    };
    let (head, tail) = digits.split_at(1.min(digits.len()));
    let mut out = format!("{sign}{head}");
    if !tail.is_empty() {
        out.push('.');
        out.push_str(tail);
    }
    if exp != 0 {
        out.push(marker);
        out.push_str(&exp.to_string());
    }
    out
}

impl Float {
    fn assign_literal(&mut self, literal: Literal, rnd: RoundingMode) -> Ternary {
        match literal {
            Literal::Nan => {
                self.set_nan();
                Ternary::Exact
            }
            Literal::Infinity { negative } => self.store(Rounded::infinity(negative)),
            Literal::Finite {
                negative,
                base,
                digits,
                scale,
                binary_scale,
            } => {
                let rounded =
                    round_literal(negative, base, &digits, scale, binary_scale, self.prec, rnd);
                self.store(rounded)
            }
        }
    }

    /// Assigns the numeral `text` written in `base` (2 to 62, or 0 to detect
    /// a `0x`/`0b` prefix), rounded to this value's precision.
    ///
    /// The whole string after leading whitespace must be a numeral.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBase`] or [`Error::Parse`]; the value is untouched in
    /// both cases.
    pub fn set_str(&mut self, text: &str, base: u32, rnd: RoundingMode) -> Result<Ternary, Error> {
        let (literal, consumed) = parse_literal(text, base).inspect_err(|err| {
            debug!(base, %err, "rejected numeral");
        })?;
        if consumed != text.len() {
            debug!(base, consumed, "trailing characters after numeral");
            return Err(ParseError::invalid(consumed).into());
        }
        Ok(self.assign_literal(literal, rnd))
    }

    /// Like [`set_str`][Self::set_str] but reads the longest numeral at the
    /// start of `text` and also returns how many bytes it spans.
    ///
    /// # Errors
    ///
    /// Fails when `text` does not start with a numeral.
    pub fn set_str_prefix(
        &mut self,
        text: &str,
        base: u32,
        rnd: RoundingMode,
    ) -> Result<(Ternary, usize), Error> {
        let (literal, consumed) = parse_literal(text, base).inspect_err(|err| {
            debug!(base, %err, "rejected numeral");
        })?;
        Ok((self.assign_literal(literal, rnd), consumed))
    }

    /// `|self| / base^g` rounded to an integer under `rnd`.
    fn scaled_integer(&self, base: u32, g: i128, work: u64, rnd: RoundingMode) -> BigUint {
        let x = Scaled {
            m: self.significand(),
            e: self.ulp_exponent(),
        };
        let one = Scaled::integer(BigUint::one());
        let n = g.unsigned_abs();
        let mut work = work;
        loop {
            let (lo, hi) = radix::pow_bounds(base, n, work);
            let (below, above) = if g >= 0 {
                (
                    radix::round_ratio(self.sign, &x, &hi, rnd),
                    radix::round_ratio(self.sign, &x, &lo, rnd),
                )
            } else {
                (
                    radix::round_ratio(self.sign, &x.mul(&lo), &one, rnd),
                    radix::round_ratio(self.sign, &x.mul(&hi), &one, rnd),
                )
            };
            if below == above {
                return below.0;
            }
            work = work.saturating_mul(2);
        }
    }

    /// The `n`-digit significand and the exponent of a finite non-zero
    /// value, in the `d.ddd × base^E` convention.
    fn digits_normal(&self, base: u32, n: usize, rnd: RoundingMode) -> (BigUint, Exponent) {
        let log2_base = f64::from(base).log2();
        let n_digits = n as i128;
        let work = self.prec.max((n as f64 * log2_base).ceil() as u64) + 64;
        let lower = BigUint::from(base).pow((n - 1) as u32);
        let upper = &lower * base;

        // |self| lies in [2^(exp-1), 2^exp).
        let mut exp = ((self.exp - 1) as f64 / log2_base).floor() as i128;
        loop {
            let t = self.scaled_integer(base, exp - n_digits + 1, work, RoundingMode::TowardZero);
            if t >= upper {
                let floor_log = ((t.bits() - 1) as f64 / log2_base).floor() as i128;
                exp += (floor_log - n_digits).max(1);
            } else if t < lower {
                let step = if t.is_zero() {
                    n_digits
                } else {
                    n_digits - 2 - (t.bits() as f64 / log2_base).floor() as i128
                };
                exp -= step.max(1);
            } else {
                break;
            }
        }

        let mut digits = self.scaled_integer(base, exp - n_digits + 1, work, rnd);
        if digits == upper {
            digits = lower;
            exp += 1;
        }
        (digits, exp as Exponent)
    }

    /// Returns `n_digits` significant digits in `base` (2 to 62), rounded
    /// under `rnd`, and the exponent `E` such that the value is
    /// `d.ddd × base^E`. Negative values get a leading `-`.
    ///
    /// `n_digits = 0` asks for the fewest digits that always read back to
    /// the same value at this precision. NaN gives `@NaN@`, infinities
    /// `@Inf@` and `-@Inf@`, zeros `n_digits` zeros; all with exponent 0.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBase`] outside 2 to 62 and [`Error::InvalidDigits`]
    /// above [`MAX_DIGITS`].
    pub fn to_digits(
        &self,
        base: u32,
        n_digits: usize,
        rnd: RoundingMode,
    ) -> Result<(String, Exponent), Error> {
        if !(MIN_BASE..=MAX_BASE).contains(&base) {
            return Err(Error::InvalidBase(base));
        }
        if n_digits > MAX_DIGITS {
            return Err(Error::InvalidDigits(n_digits));
        }
        let n = if n_digits == 0 {
            round_trip_digits(self.prec, base)
        } else {
            n_digits
        };
        let sign = if self.sign { "-" } else { "" };

        let (text, exp) = match self.kind {
            Kind::Nan => ("@NaN@".to_string(), 0),
            Kind::Infinity => (format!("{sign}@Inf@"), 0),
            Kind::Zero => (format!("{sign}{}", "0".repeat(n)), 0),
            Kind::Normal => {
                let (digits, exp) = self.digits_normal(base, n, rnd);
                let mut text = String::with_capacity(n + 1);
                text.push_str(sign);
                text.extend(
                    digits
                        .to_radix_be(base)
                        .into_iter()
                        .map(|d| radix::digit_char(d, base)),
                );
                (text, exp)
            }
        };
        Ok((text, exp))
    }

    /// Formats the value so that [`set_str`][Self::set_str] in the same base
    /// reads it back exactly: `[-]d.ddd` with trailing zeros removed and an
    /// exponent introduced by `e` up to base 10 and by `@` above.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBase`] outside 2 to 62.
    pub fn to_string_radix(&self, base: u32, rnd: RoundingMode) -> Result<String, Error> {
        let (digits, exp) = self.to_digits(base, 0, rnd)?;
        Ok(match self.kind {
            Kind::Normal => {
                let marker = if base <= 10 { 'e' } else { '@' };
                scientific(&digits, exp, marker, true)
            }
            Kind::Zero => String::from(if self.sign { "-0" } else { "0" }),
            Kind::Nan | Kind::Infinity => digits,
        })
    }
}

/// Writes `[-]d.ddd`, then `zeros` more zero digits, then the exponent.
fn write_padded(
    f: &mut fmt::Formatter<'_>,
    digits: &str,
    exp: Exponent,
    zeros: usize,
) -> fmt::Result {
    f.write_str(&scientific(digits, 0, 'e', false))?;
    if zeros > 0 {
        if digits.trim_start_matches('-').len() == 1 {
            f.write_str(".")?;
        }
        let chunk = "0".repeat(zeros.min(1 << 16));
        let mut left = zeros;
        while left > 0 {
            let n = left.min(chunk.len());
            f.write_str(&chunk[..n])?;
            left -= n;
        }
    }
    if exp != 0 {
        write!(f, "e{exp}")?;
    }
    Ok(())
}

impl Float {
    /// Upper bound on the significant decimal digits of the exact value.
    fn exact_decimal_digits(&self) -> usize {
        let bits = self.prec as f64;
        let ulp = self.ulp_exponent();
        let digits = if ulp >= 0 {
            (bits + ulp as f64) * LOG10_2
        } else {
            bits * LOG10_2 + ulp.unsigned_abs() as f64 * (1.0 - LOG10_2)
        };
        (digits.ceil() as usize).saturating_add(1)
    }
}

/// Decimal scientific notation, rounded to nearest.
///
/// Without a precision, prints as many digits as are needed to read the
/// value back at its precision, trailing zeros removed. `{:.N}` prints `N`
/// digits after the point; digits past the exact expansion are zeros, and
/// beyond [`MAX_DIGITS`] the value is rounded there and padded.
impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Nan => f.write_str("NaN"),
            Kind::Infinity => f.write_str(if self.sign { "-inf" } else { "inf" }),
            Kind::Zero => f.write_str(if self.sign { "-0" } else { "0" }),
            Kind::Normal => match f.precision() {
                None => {
                    let (digits, exp) = self
                        .to_digits(10, 0, RoundingMode::Nearest)
                        .map_err(|_| fmt::Error)?;
                    f.write_str(&scientific(&digits, exp, 'e', true))
                }
                Some(fraction) => {
                    let wanted = fraction.saturating_add(1);
                    let n = wanted.min(self.exact_decimal_digits()).min(MAX_DIGITS);
                    let (digits, exp) = self
                        .to_digits(10, n, RoundingMode::Nearest)
                        .map_err(|_| fmt::Error)?;
                    write_padded(f, &digits, exp, wanted - n)
                }
            },
        }
    }
}

/// Parses a decimal numeral at the default precision, rounding with the
/// default mode.
impl FromStr for Float {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Config {
            precision,
            rounding,
        } = config::snapshot();
        let mut value = Float::new_unchecked(precision);
        value.set_str(s, 10, rounding)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rstest::rstest;

    use super::*;
    use crate::tests::*;

    fn float(prec: u64) -> Float {
        Float::with_precision(prec).unwrap()
    }

    fn parse(text: &str, base: u32, prec: u64) -> Float {
        let mut x = float(prec);
        x.set_str(text, base, RoundingMode::Nearest).unwrap();
        x
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_pi_literal() {
        let mut x = float(53);
        let t = x.set_str("3.14159265358979", 10, RoundingMode::Nearest).unwrap();
        assert_ne!(t, Ternary::Exact);
        assert_eq!(x.to_f64(RoundingMode::Nearest), 3.14159265358979);
    }

    #[rstest]
    fn test_parse_matches_f64(mut rng: impl Rng, n_experiments: usize) {
        let mut x = float(53);
        for _ in 0..n_experiments {
            let value = random_f64(&mut rng);
            if !value.is_normal() {
                continue;
            }
            for text in [format!("{value:e}"), format!("{value}")] {
                x.set_str(&text, 10, RoundingMode::Nearest).unwrap();
                assert_eq!(x.to_f64(RoundingMode::Nearest), value, "{text}");
            }
        }
    }

    #[rstest]
    fn test_round_trip(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments / 50 {
            let prec = rng.random_range(1..200);
            let bits: String = (1..prec)
                .map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
                .collect();
            let sign = if rng.random_bool(0.5) { "-" } else { "" };
            let text = format!("{sign}1{bits}p{}", rng.random_range(-2000..2000));
            let x = parse(&text, 2, prec);

            for _ in 0..5 {
                let base = rng.random_range(MIN_BASE..=MAX_BASE);
                let printed = x.to_string_radix(base, RoundingMode::Nearest).unwrap();
                let back = parse(&printed, base, prec);
                assert_eq!(back, x, "{text} printed as {printed} in base {base}");
                assert_eq!(back.sign(), x.sign());
            }
        }
    }

    #[test]
    fn test_huge_exponents() {
        let mut x = float(53);
        x.set_str("1e1000000000", 10, RoundingMode::Nearest).unwrap();
        assert!(x.is_normal());
        // ceil(10^9 × log2(10))
        assert_eq!(x.exponent(), Some(3321928095));
        assert_eq!(
            x.to_digits(10, 5, RoundingMode::Nearest).unwrap(),
            ("10000".to_string(), 1000000000)
        );
        let printed = x.to_string_radix(10, RoundingMode::Nearest).unwrap();
        assert_eq!(parse(&printed, 10, 53), x);

        x.set_str("-7.25e-1000000000", 10, RoundingMode::Nearest).unwrap();
        assert!(x.is_normal() && x.sign());
        assert_eq!(
            x.to_digits(10, 3, RoundingMode::Nearest).unwrap(),
            ("-725".to_string(), -1000000000)
        );
        let printed = x.to_string_radix(36, RoundingMode::Nearest).unwrap();
        assert_eq!(parse(&printed, 36, 53), x);
    }

    #[test]
    fn test_parse_overflow_underflow() {
        let mut x = float(53);
        let t = x.set_str("1e2000000000000000000", 10, RoundingMode::Nearest).unwrap();
        assert!(x.is_infinity() && !x.sign());
        assert_eq!(t, Ternary::Greater);
        let t = x.set_str("-1e2000000000000000000", 10, RoundingMode::TowardZero).unwrap();
        assert!(x.is_normal() && x.sign());
        assert_eq!(x.exponent(), Some(EXP_MAX));
        assert_eq!(t, Ternary::Greater);

        let t = x.set_str("1e-2000000000000000000", 10, RoundingMode::Nearest).unwrap();
        assert!(x.is_zero() && !x.sign());
        assert_eq!(t, Ternary::Less);
        let t = x.set_str("1e-2000000000000000000", 10, RoundingMode::Up).unwrap();
        assert_eq!(x.exponent(), Some(EXP_MIN));
        assert_eq!(t, Ternary::Greater);

        // Power-of-two bases take the exact path.
        x.set_str("1p9000000000000000000", 2, RoundingMode::Nearest).unwrap();
        assert!(x.is_infinity());
        x.set_str("0x1p-9000000000000000000", 16, RoundingMode::Nearest).unwrap();
        assert!(x.is_zero());
    }

    #[test]
    fn test_specials() {
        let mut x = float(10);
        for (text, base) in [("@nan@", 10), ("@NaN@", 62), ("nan", 16), ("NaN(abc_1)", 10)] {
            x.set_i64(1, RoundingMode::Nearest);
            assert_eq!(x.set_str(text, base, RoundingMode::Nearest), Ok(Ternary::Exact));
            assert!(x.is_nan(), "{text}");
        }
        for (text, base, negative) in [
            ("inf", 10, false),
            ("-Infinity", 0, true),
            ("+INF", 16, false),
            ("-@inf@", 62, true),
            ("  @Inf@", 17, false),
        ] {
            assert_eq!(x.set_str(text, base, RoundingMode::Nearest), Ok(Ternary::Exact));
            assert!(x.is_infinity(), "{text}");
            assert_eq!(x.sign(), negative, "{text}");
        }

        // A malformed tag is not part of the numeral.
        assert_eq!(
            x.set_str_prefix("nan(a-b)", 10, RoundingMode::Nearest),
            Ok((Ternary::Exact, 3))
        );
        // Letters are digits in base 36.
        let y = parse("inf", 36, 53);
        assert_eq!(y.to_i64(RoundingMode::Nearest), 18 * 36 * 36 + 23 * 36 + 15);
    }

    #[test]
    fn test_prefixes_and_exponents() {
        let cases = [
            ("0x1.8p3", 0, 12.0),
            ("0X10", 16, 16.0),
            ("ff", 16, 255.0),
            ("0b101", 0, 5.0),
            ("-0b11e2", 0, -12.0),
            ("1@3", 10, 1000.0),
            ("1e+2", 10, 100.0),
            ("2.5E-1", 10, 0.25),
            ("1.1p-1", 2, 0.75),
            ("a@1", 16, 160.0),
            ("Zz", 62, 2231.0),
            (".5", 10, 0.5),
            ("5.", 10, 5.0),
            ("  -00.0625", 10, -0.0625),
        ];
        for (text, base, expected) in cases {
            let x = parse(text, base, 53);
            assert_eq!(x.to_f64(RoundingMode::Nearest), expected, "{text}");
        }

        let mut x = float(53);
        assert_eq!(
            x.set_str_prefix("12.5kg", 10, RoundingMode::Nearest),
            Ok((Ternary::Exact, 4))
        );
        assert_eq!(x.set_str_prefix("1.5e", 10, RoundingMode::Nearest), Ok((Ternary::Exact, 3)));
        assert_eq!(x.set_str_prefix("0x", 0, RoundingMode::Nearest), Ok((Ternary::Exact, 1)));
        assert!(x.is_zero());
        assert_eq!(x.set_str_prefix("1p3", 10, RoundingMode::Nearest), Ok((Ternary::Exact, 1)));
        assert_eq!(x.set_str_prefix("0b12", 2, RoundingMode::Nearest), Ok((Ternary::Exact, 3)));
        assert_eq!(x.to_f64(RoundingMode::Nearest), 1.0);

        x.set_str("-0.000", 10, RoundingMode::Nearest).unwrap();
        assert!(x.is_zero() && x.sign());
    }

    #[test]
    fn test_parse_rounding() {
        let mut x = float(4);
        assert_eq!(x.set_str("255", 10, RoundingMode::Nearest), Ok(Ternary::Greater));
        assert_eq!(x.to_i64(RoundingMode::Nearest), 256);
        assert_eq!(x.set_str("-255", 10, RoundingMode::Up), Ok(Ternary::Greater));
        assert_eq!(x.to_i64(RoundingMode::Nearest), -240);

        let mut x = float(24);
        for rnd in MODES {
            let t = x.set_str("0.1", 10, rnd).unwrap();
            // 0.1f32 lies above 0.1.
            let expected = match rnd {
                RoundingMode::Nearest | RoundingMode::Up | RoundingMode::Away => 0.1f32,
                RoundingMode::Down | RoundingMode::TowardZero => {
                    f32::from_bits(0.1f32.to_bits() - 1)
                }
            };
            assert_eq!(x.to_f64(RoundingMode::Nearest), f64::from(expected), "{rnd:?}");
            assert_ne!(t, Ternary::Exact);
        }
    }

    #[test]
    fn test_parse_errors() {
        let mut x = float(20);
        x.set_i64(3, RoundingMode::Nearest);
        let cases = [
            ("", 10, Error::Parse(ParseError::empty())),
            ("   ", 10, Error::Parse(ParseError::empty())),
            ("-", 10, Error::Parse(ParseError::invalid(1))),
            ("abc", 10, Error::Parse(ParseError::invalid(0))),
            (" .e5", 10, Error::Parse(ParseError::invalid(1))),
            ("1.5x", 10, Error::Parse(ParseError::invalid(3))),
            ("1.5 ", 10, Error::Parse(ParseError::invalid(3))),
            ("12", 2, Error::Parse(ParseError::invalid(1))),
            ("1", 1, Error::InvalidBase(1)),
            ("1", 63, Error::InvalidBase(63)),
        ];
        for (text, base, err) in cases {
            assert_eq!(x.set_str(text, base, RoundingMode::Nearest), Err(err), "{text:?}");
            assert_eq!(x.to_i64(RoundingMode::Nearest), 3);
        }
        assert!(x.set_str_prefix("zz", 10, RoundingMode::Nearest).is_err());
        assert_eq!(x.to_i64(RoundingMode::Nearest), 3);
    }

    #[test]
    fn test_to_digits() {
        let x = parse("0.75", 10, 53);
        assert_eq!(
            x.to_digits(10, 0, RoundingMode::Nearest).unwrap(),
            ("75000000000000000".to_string(), -1)
        );
        assert_eq!(
            x.to_digits(16, 0, RoundingMode::Nearest).unwrap(),
            ("c0000000000000".to_string(), -1)
        );
        let (digits, exp) = x.to_digits(2, 0, RoundingMode::Nearest).unwrap();
        assert_eq!(digits.len(), 53);
        assert!(digits.starts_with("110"));
        assert_eq!(exp, -1);

        let mut third = float(53);
        third.assign_div(&parse("2", 10, 53), &parse("3", 10, 53), RoundingMode::Nearest);
        assert_eq!(
            third.to_digits(10, 3, RoundingMode::Nearest).unwrap(),
            ("667".to_string(), -1)
        );
        assert_eq!(
            third.to_digits(10, 3, RoundingMode::TowardZero).unwrap(),
            ("666".to_string(), -1)
        );

        // Rounding carries into a new digit.
        let x = parse("9.99", 10, 53);
        assert_eq!(
            x.to_digits(10, 2, RoundingMode::Nearest).unwrap(),
            ("10".to_string(), 1)
        );
        assert_eq!(
            x.to_digits(10, 2, RoundingMode::Down).unwrap(),
            ("99".to_string(), 0)
        );
        let x = parse("-9.99", 10, 53);
        assert_eq!(
            x.to_digits(10, 2, RoundingMode::Down).unwrap(),
            ("-10".to_string(), 1)
        );

        assert_eq!(
            parse("61", 10, 10).to_digits(62, 1, RoundingMode::Nearest).unwrap(),
            ("z".to_string(), 0)
        );
        assert_eq!(
            parse("36", 10, 10).to_digits(62, 0, RoundingMode::Nearest).unwrap(),
            ("a00".to_string(), 0)
        );
        assert_eq!(
            parse("1e100", 10, 400).to_digits(10, 3, RoundingMode::Nearest).unwrap(),
            ("100".to_string(), 100)
        );
    }

    #[test]
    fn test_to_digits_specials_and_errors() {
        let mut x = float(20);
        assert_eq!(
            x.to_digits(10, 0, RoundingMode::Nearest).unwrap(),
            ("@NaN@".to_string(), 0)
        );
        x.set_inf(true);
        assert_eq!(
            x.to_digits(16, 0, RoundingMode::Nearest).unwrap(),
            ("-@Inf@".to_string(), 0)
        );
        x.set_zero(true);
        assert_eq!(
            x.to_digits(10, 4, RoundingMode::Nearest).unwrap(),
            ("-0000".to_string(), 0)
        );

        assert_eq!(
            x.to_digits(1, 0, RoundingMode::Nearest),
            Err(Error::InvalidBase(1))
        );
        assert_eq!(
            x.to_digits(63, 0, RoundingMode::Nearest),
            Err(Error::InvalidBase(63))
        );
        assert_eq!(
            x.to_digits(10, MAX_DIGITS + 1, RoundingMode::Nearest),
            Err(Error::InvalidDigits(MAX_DIGITS + 1))
        );
    }

    #[test]
    fn test_round_trip_digits() {
        assert_eq!(round_trip_digits(53, 10), 17);
        assert_eq!(round_trip_digits(24, 10), 9);
        assert_eq!(round_trip_digits(53, 2), 53);
        assert_eq!(round_trip_digits(53, 16), 14);
        assert_eq!(round_trip_digits(1, 16), 1);
    }

    #[test]
    fn test_to_string_radix() {
        let rnd = RoundingMode::Nearest;
        assert_eq!(parse("1.5", 10, 53).to_string_radix(10, rnd).unwrap(), "1.5");
        assert_eq!(parse("1500", 10, 53).to_string_radix(10, rnd).unwrap(), "1.5e3");
        assert_eq!(parse("255", 10, 53).to_string_radix(16, rnd).unwrap(), "f.f@1");
        assert_eq!(parse("-0.25", 10, 53).to_string_radix(2, rnd).unwrap(), "-1e-2");

        let mut x = float(10);
        assert_eq!(x.to_string_radix(10, rnd).unwrap(), "@NaN@");
        x.set_inf(false);
        assert_eq!(x.to_string_radix(36, rnd).unwrap(), "@Inf@");
        x.set_zero(true);
        assert_eq!(x.to_string_radix(10, rnd).unwrap(), "-0");
        assert_eq!(x.to_string_radix(0, rnd), Err(Error::InvalidBase(0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(parse("1.5", 10, 53).to_string(), "1.5");
        assert_eq!(parse("0.1", 10, 53).to_string(), "1.0000000000000001e-1");
        assert_eq!(parse("0.1", 10, 24).to_string(), "1.00000001e-1");
        assert_eq!(parse("0.5", 10, 24).to_string(), "5e-1");
        assert_eq!(parse("-12345", 10, 53).to_string(), "-1.2345e4");

        let mut third = float(53);
        third.assign_div(&parse("2", 10, 53), &parse("3", 10, 53), RoundingMode::Nearest);
        assert_eq!(format!("{third:.3}"), "6.667e-1");
        assert_eq!(format!("{:.2}", parse("2", 10, 53)), "2.00");

        let mut x = float(10);
        assert_eq!(x.to_string(), "NaN");
        x.set_inf(true);
        assert_eq!(x.to_string(), "-inf");
        x.set_zero(false);
        assert_eq!(x.to_string(), "0");
    }

    /// Counts written bytes without keeping them.
    struct Counter(usize);

    impl fmt::Write for Counter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.0 += s.len();
            Ok(())
        }
    }

    #[test]
    fn test_display_long_precision() {
        let one = parse("1", 10, 53);
        assert_eq!(format!("{one:.60}"), format!("1.{}", "0".repeat(60)));
        assert_eq!(format!("{:.0}", one), "1");
        assert_eq!(format!("{:.3}", parse("-1500", 10, 53)), "-1.500e3");

        // The exact expansion of the nearest double to 2/3, then zeros.
        let mut third = float(53);
        third.assign_div(&parse("2", 10, 53), &parse("3", 10, 53), RoundingMode::Nearest);
        let exact = "6.6666666666666662965923251249478198587894439697265625";
        let zeros = "0".repeat(70 + 2 - exact.len());
        assert_eq!(format!("{third:.70}"), format!("{exact}{zeros}e-1"));

        // Longer than to_digits can produce.
        let fraction = MAX_DIGITS + 10;
        let mut sink = Counter(0);
        assert!(fmt::Write::write_fmt(&mut sink, format_args!("{one:.fraction$}")).is_ok());
        assert_eq!(sink.0, 2 + fraction);

        let mut sink = Counter(0);
        let tiny = parse("-1e-5", 10, 53);
        assert!(fmt::Write::write_fmt(&mut sink, format_args!("{tiny:.fraction$}")).is_ok());
        assert_eq!(sink.0, "-1.".len() + fraction + "e-5".len());
    }

    #[test]
    fn test_from_str() {
        let _guard = CONFIG_LOCK.lock();
        let x: Float = "2.5".parse().unwrap();
        assert_eq!(x.precision(), config::default_precision());
        assert_eq!(x.to_f64(RoundingMode::Nearest), 2.5);

        let y: Float = x.to_string().parse().unwrap();
        assert_eq!(y, x);

        assert!("2.5.1".parse::<Float>().is_err());
        assert!(matches!("".parse::<Float>(), Err(Error::Parse(e)) if e.is_empty()));
    }
}
