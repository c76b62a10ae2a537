use super::SqrtFloat;

/// The starting point of the iteration.
pub(super) struct Estimate<F> {
    /// The input, scaled by an even power of two into [1, 4).
    pub reduced: F,
    /// A 53-bit approximation of the root of `reduced`.
    pub seed: F,
    /// The root of the input is the root of `reduced` times 2^half_exp.
    pub half_exp: i64,
}

/// Reduce the positive normal `x` to [1, 4) and take the native square root
/// of the reduced value. Working on the reduced value keeps the seed inside
/// of the f64 range for every exponent of `x`.
pub(super) fn estimate<F: SqrtFloat>(x: &F) -> Estimate<F> {
    estimate_with(x, native_sqrt)
}

/// Same as [`estimate`], with the seed taken from `root_of`, which must
/// return a 53-bit approximation of the root of values in [1, 4).
pub(super) fn estimate_with<F: SqrtFloat>(x: &F, root_of: fn(f64) -> f64) -> Estimate<F> {
    // x = m * 2^e, with m in [1, 2). Make the exponent even, which moves m
    // into [1, 4).
    let mut exp = x.exponent();
    if exp % 2 != 0 {
        exp -= 1;
    }
    let reduced = x.scale_exact(-exp);
    let seed = F::from_f64_exact(root_of(reduced.to_f64_nearest()));
    Estimate {
        reduced,
        seed,
        half_exp: exp / 2,
    }
}

#[cfg(feature = "std")]
fn native_sqrt(val: f64) -> f64 {
    val.sqrt()
}

#[cfg(not(feature = "std"))]
fn native_sqrt(val: f64) -> f64 {
    integer_sqrt(val)
}

/// The root of `val` in [1, 4), from the integer root of its significand.
/// The result is truncated, so it may be one ulp below the native root.
#[cfg(any(test, not(feature = "std")))]
pub(super) fn integer_sqrt(val: f64) -> f64 {
    // val = n * 2^-52, so sqrt(val) = sqrt(n * 2^52) * 2^-52.
    let n = ((val * (1u64 << 52) as f64) as u128) << 52;
    let mut root = 1u128 << 53;
    loop {
        let next = (root + n / root) / 2;
        if next >= root {
            break;
        }
        root = next;
    }
    root as f64 / (1u64 << 52) as f64
}

#[cfg(feature = "std")]
#[test]
fn test_estimate_reduces_exponent() {
    use crate::Float;

    for (val, half_exp) in [(2.0, 0), (8.0, 1), (0.5, -1), (0.25, -1), (1e300, 498), (3e-300, -498)] {
        let est = estimate(&Float::from_f64(val));
        let reduced = est.reduced.as_f64();
        assert!((1.0..4.0).contains(&reduced), "{} -> {}", val, reduced);
        assert_eq!(est.half_exp, half_exp, "{}", val);
        assert_eq!(est.seed.get_precision(), 53);
        assert_eq!(est.seed.as_f64(), reduced.sqrt());
    }

    // Exponents far outside of the f64 range.
    let x = Float::from_f64(3.0).scale(-1_000_001);
    let est = estimate(&x);
    assert_eq!(est.half_exp, -500_000);
    assert_eq!(est.reduced.as_f64(), 1.5);
}

#[test]
fn test_native_sqrt() {
    for v in [1.0, 1.5, 2.0, 2.25, 3.0, 3.999999] {
        for r in [native_sqrt(v), integer_sqrt(v)] {
            assert!(r * r - v < 1e-14 && v - r * r < 1e-14, "{}", v);
        }
    }
    // Perfect squares have exact integer roots.
    assert_eq!(integer_sqrt(1.0), 1.0);
    assert_eq!(integer_sqrt(2.25), 1.5);
    assert_eq!(integer_sqrt(3.515625), 1.875);
}

#[cfg(feature = "std")]
#[test]
fn test_integer_sqrt_is_within_an_ulp() {
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new_with_seed(13);
    for _ in 0..10_000 {
        let v = 1.0 + 3.0 * lfsr.next_unit_f64();
        let native = v.sqrt().to_bits();
        let int = integer_sqrt(v).to_bits();
        assert!(int == native || int + 1 == native, "{}", v);
    }
}
