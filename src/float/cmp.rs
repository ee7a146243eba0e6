use std::cmp::Ordering;

use crate::float::{Float, Kind};

impl Float {
    /// Compares magnitudes of two finite non-zero values, whatever their
    /// precisions.
    fn cmp_normal_abs(&self, other: &Float) -> Ordering {
        self.exp.cmp(&other.exp).then_with(|| {
            let (a, b) = (self.significand(), other.significand());
            if self.prec >= other.prec {
                a.cmp(&(b << (self.prec - other.prec)))
            } else {
                (a << (other.prec - self.prec)).cmp(&b)
            }
        })
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // Position on the extended real line, ignoring the finite magnitude.
        fn rank(x: &Float) -> i8 {
            match (x.kind, x.sign) {
                (Kind::Infinity, true) => -2,
                (Kind::Normal, true) => -1,
                (Kind::Zero, _) => 0,
                (Kind::Normal, false) => 1,
                (Kind::Infinity, false) => 2,
                (Kind::Nan, _) => 0,
            }
        }

        if self.is_nan() || other.is_nan() {
            return None;
        }
        let (ra, rb) = (rank(self), rank(other));
        if ra != rb {
            return Some(ra.cmp(&rb));
        }
        Some(match ra {
            1 => self.cmp_normal_abs(other),
            -1 => other.cmp_normal_abs(self),
            _ => Ordering::Equal,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rstest::rstest;

    use super::*;
    use crate::round::RoundingMode;
    use crate::tests::*;

    fn float(prec: u64, value: f64) -> Float {
        let mut x = Float::with_precision(prec).unwrap();
        x.set_f64(value, RoundingMode::Nearest);
        x
    }

    #[rstest]
    #[allow(clippy::eq_op)]
    fn test_partial_eq(mut rng: impl Rng, n_experiments: usize) {
        let a = float(53, 1.5);
        let b = float(53, 2.5);
        assert_eq!(a, a);
        assert_ne!(a, b);

        let nan = Float::with_precision(53).unwrap();
        assert!(nan != nan);
        assert!(nan != a);

        for _ in 0..n_experiments {
            let va = random_f64(&mut rng);
            let vb = if rng.random_bool(0.1) { va } else { random_f64(&mut rng) };
            let fa = float(53, va);
            let fb = float(53, vb);
            assert_eq!(fa == fb, va == vb);
            assert_eq!(fa == fa, va == va);
        }
    }

    #[rstest]
    fn test_partial_ord(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments {
            let va = random_f64(&mut rng);
            let vb = random_f64(&mut rng);
            let fa = float(53, va);
            let fb = float(53, vb);
            assert_eq!(fa.partial_cmp(&fb), va.partial_cmp(&vb), "{va} {vb}");
            assert_eq!(fa < fb, va < vb);
            assert_eq!(fa >= fb, va >= vb);
        }
    }

    #[test]
    fn test_mixed_precisions() {
        let a = float(10, 0.75);
        let b = float(200, 0.75);
        assert_eq!(a, b);
        assert_eq!(b, a);

        let mut c = Float::with_precision(200).unwrap();
        c.set_f64(0.75, RoundingMode::Nearest);
        let mut tiny = Float::with_precision(200).unwrap();
        tiny.set_f64(2f64.powi(-150), RoundingMode::Nearest);
        c.assign_add(&c.clone(), &tiny, RoundingMode::Nearest);
        assert!(a < c);
        assert!(c > a);
        assert!(-&c < -&a);
    }

    #[test]
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn test_specials() {
        let mut pz = Float::with_precision(10).unwrap();
        pz.set_zero(false);
        let mut nz = Float::with_precision(20).unwrap();
        nz.set_zero(true);
        assert_eq!(pz, nz);
        assert_eq!(pz.partial_cmp(&nz), Some(Ordering::Equal));

        let mut inf = Float::with_precision(10).unwrap();
        inf.set_inf(false);
        let mut ninf = Float::with_precision(10).unwrap();
        ninf.set_inf(true);
        let big = float(10, f64::MAX);
        assert!(ninf < -&big && -&big < nz && nz < big && big < inf);
        assert_eq!(inf, inf.clone());

        let nan = Float::with_precision(10).unwrap();
        assert_eq!(nan.partial_cmp(&pz), None);
        assert_eq!(inf.partial_cmp(&nan), None);
        assert!(!(nan < inf) && !(nan > inf));
    }
}
