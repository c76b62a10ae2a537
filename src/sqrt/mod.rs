//! Correctly rounded square root.
//!
//! The algorithm runs in five stages. The dispatcher handles the special
//! values, the estimate stage reduces the input to [1, 4) and takes a 53-bit
//! seed from the native square root, the schedule lists the working
//! precisions, the Newton stage refines the seed at each of them, and the
//! finalizer rounds once to the precision of the input.

mod backend;
mod dispatch;
mod estimate;
mod finalize;
mod newton;
mod schedule;

pub use self::schedule::precision_schedule;

use self::dispatch::Classified;
use super::error::SqrtError;
use super::float::{Accuracy, Category, Float};
use core::cmp::Ordering;

/// The number of extra bits that the last Newton steps carry beyond the
/// precision of the result.
pub const GUARD_BITS: usize = 64;

/// The precision of the seed, which comes from the native `f64::sqrt`.
pub const SEED_PRECISION: usize = 53;

/// The number of Newton steps that run at the final working precision
/// after the schedule reaches it.
pub const SETTLE_PASSES: usize = 2;

/// The arbitrary-precision arithmetic that the square root algorithm needs.
///
/// Every arithmetic method rounds to the nearest even, at the larger of the
/// precisions of its operands. Values are immutable; each operation returns
/// a new value.
pub trait SqrtFloat: Sized + Clone {
    /// Returns the number of bits in the significand.
    fn precision(&self) -> usize;

    /// Returns the kind of the value (normal, zero, infinity, NaN).
    fn category(&self) -> Category;

    /// Returns true if the sign bit is set.
    fn is_negative(&self) -> bool;

    /// Creates a zero, infinity or NaN with the precision `prec`.
    fn special(category: Category, prec: usize, negative: bool) -> Self;

    /// Returns `e` for a normal value `m * 2^e` with `m` in [1, 2).
    fn exponent(&self) -> i64;

    /// Returns the value multiplied by 2^`k`, without rounding.
    fn scale_exact(&self, k: i64) -> Self;

    /// Returns the value rounded to the nearest f64.
    fn to_f64_nearest(&self) -> f64;

    /// Creates a value with 53 bits of precision that holds `val` exactly.
    fn from_f64_exact(val: f64) -> Self;

    /// Returns the value rounded to `prec` bits, and the direction of the
    /// rounding.
    fn round_nearest(&self, prec: usize) -> (Self, Accuracy);

    fn add_nearest(&self, rhs: &Self) -> Self;

    fn mul_nearest(&self, rhs: &Self) -> Self;

    fn div_nearest(&self, rhs: &Self) -> Self;

    /// Compares two normal values, which may have different precisions.
    fn cmp_normal(&self, rhs: &Self) -> Ordering;
}

/// Computes the square root of `x`, rounded to the nearest even at the
/// precision of `x`. Returns the root and the direction of the rounding
/// relative to the exact root.
///
/// The square root of -0 is -0, of +Inf is +Inf, and of NaN is NaN. Negative
/// numbers (including -Inf) return [`SqrtError::Domain`].
pub fn sqrt<F: SqrtFloat>(x: &F) -> Result<(F, Accuracy), SqrtError> {
    match dispatch::classify(x)? {
        Classified::Done(value, accuracy) => Ok((value, accuracy)),
        Classified::Normal => Ok(sqrt_normal(estimate::estimate(x), x.precision())),
    }
}

/// Refine the estimate of the root of a positive normal value, and round it
/// to `prec` bits.
fn sqrt_normal<F: SqrtFloat>(est: estimate::Estimate<F>, prec: usize) -> (F, Accuracy) {
    let schedule = precision_schedule(prec);
    let z = newton::iterate(&est.reduced, est.seed, &schedule);
    finalize::finalize(&est.reduced, &z, prec, est.half_exp)
}

impl Float {
    /// Computes the square root of this number, rounded to the nearest even
    /// at the precision of this number. See [`sqrt`].
    ///
    /// ```
    ///    use sqrtfloat::{Accuracy, Float};
    ///
    ///    let x = Float::from_u64(100, 144);
    ///    let (root, acc) = x.sqrt().unwrap();
    ///    assert_eq!(root, Float::from_u64(100, 12));
    ///    assert_eq!(acc, Accuracy::Exact);
    ///    assert!(Float::from_i64(100, -1).sqrt().is_err());
    /// ```
    pub fn sqrt(&self) -> Result<(Float, Accuracy), SqrtError> {
        sqrt(self)
    }
}

#[test]
fn test_sqrt_simple() {
    for i in 0..200u64 {
        let x = Float::from_u64(53, i * i);
        let (root, acc) = x.sqrt().unwrap();
        assert_eq!(root.as_f64(), i as f64);
        assert_eq!(acc, Accuracy::Exact);
    }

    let (root, acc) = Float::from_u64(53, 2).sqrt().unwrap();
    assert_eq!(root.as_f64(), core::f64::consts::SQRT_2);
    assert_eq!(acc, Accuracy::RoundedUp);
    assert_eq!(root.get_precision(), 53);

    let (root, acc) = Float::from_f64(0.25).sqrt().unwrap();
    assert_eq!(root.as_f64(), 0.5);
    assert_eq!(acc, Accuracy::Exact);
}

#[cfg(feature = "std")]
#[test]
fn test_sqrt_native() {
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new();
    for _ in 0..5000 {
        // Random positive doubles over the whole normal range.
        let bits = lfsr.next_u64() >> 1;
        let v = f64::from_bits(bits);
        if !v.is_normal() {
            continue;
        }
        let (root, acc) = Float::from_f64(v).sqrt().unwrap();
        let (r, conv) = root.to_f64();
        assert_eq!(r.to_bits(), v.sqrt().to_bits(), "sqrt({})", v);
        assert_eq!(conv, Accuracy::Exact);
        // The square of a 53-bit number is exact at 106 bits.
        let wide = root.cast(106);
        let expected = match (&wide * &wide).partial_cmp(&Float::from_f64(v)) {
            Some(Ordering::Less) => Accuracy::RoundedDown,
            Some(Ordering::Greater) => Accuracy::RoundedUp,
            _ => Accuracy::Exact,
        };
        assert_eq!(acc, expected);
    }
}

#[cfg(feature = "std")]
#[test]
fn test_sqrt_f32_precision() {
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new_with_seed(7);
    for _ in 0..5000 {
        let v = f32::from_bits((lfsr.next_u64() >> 33) as u32);
        if !v.is_normal() {
            continue;
        }
        let (root, _) = Float::from_f32(v).sqrt().unwrap();
        assert_eq!(root.get_precision(), 24);
        let (r, conv) = root.to_f32();
        assert_eq!(r.to_bits(), v.sqrt().to_bits(), "sqrt({})", v);
        assert_eq!(conv, Accuracy::Exact);
    }
}

#[cfg(feature = "std")]
#[test]
fn test_seeds_agree() {
    use crate::utils::Lfsr;

    // The integer seed of no_std builds gives the same roots as f64::sqrt.
    let mut lfsr = Lfsr::new_with_seed(21);
    for prec in [1, 2, 11, 24, 53, 64, 113, 300, 1000] {
        for _ in 0..200 {
            let bits = Float::from_u64(64, lfsr.next_u64() | 1).cast(prec);
            let x = bits.scale((lfsr.next_u64() % 400) as i64 - 200);
            let native = sqrt_normal(estimate::estimate_with(&x, f64::sqrt), prec);
            let integer = sqrt_normal(estimate::estimate_with(&x, estimate::integer_sqrt), prec);
            assert_eq!(native.0, integer.0, "prec = {}, x = {}", prec, x);
            assert_eq!(native.1, integer.1);
            assert_eq!(native, x.sqrt().unwrap());
        }
    }
}
