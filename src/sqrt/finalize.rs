use super::SqrtFloat;
use crate::float::Accuracy;
use core::cmp::Ordering;

/// Compare `root^2` with `x`. The square is computed exactly, at twice the
/// precision of `root`.
fn cmp_square<F: SqrtFloat>(root: &F, x: &F) -> Ordering {
    let (wide, _) = root.round_nearest(2 * root.precision());
    wide.mul_nearest(&wide).cmp_normal(x)
}

/// Returns 2^k, or -2^k if `negative` is set.
fn pow2<F: SqrtFloat>(k: i64, negative: bool) -> F {
    let one = if negative { -1.0 } else { 1.0 };
    F::from_f64_exact(one).scale_exact(k)
}

/// Returns k, where 2^k is the distance from the normal `val` (with `prec`
/// bits) to its neighbor above, or below.
fn ulp<F: SqrtFloat>(val: &F, prec: usize, up: bool) -> i64 {
    let exp = val.exponent();
    let lsb = exp - prec as i64 + 1;
    if up {
        return lsb;
    }
    // Below a power of two the numbers are twice as dense.
    let is_pow2 = val.scale_exact(-exp).cmp_normal(&F::from_f64_exact(1.0));
    if is_pow2 == Ordering::Equal {
        lsb - 1
    } else {
        lsb
    }
}

/// Returns `val` moved by 2^`k`, up or down, computed exactly at `prec`
/// bits (or 53, if wider).
fn step<F: SqrtFloat>(val: &F, k: i64, up: bool, prec: usize) -> F {
    let (wide, _) = val.round_nearest(prec);
    wide.add_nearest(&pow2(k, !up))
}

/// Round the converged root `z` of the reduced input `x` to `prec` bits,
/// and scale it back by 2^`half_exp`. Returns the root and the direction of
/// the rounding.
///
/// The guard bits make `z` round correctly in practice. The rounded root is
/// then checked against the exact square: if the exact root lies past the
/// midpoint to the neighbor, the neighbor is the correctly rounded root.
pub(super) fn finalize<F: SqrtFloat>(
    x: &F,
    z: &F,
    prec: usize,
    half_exp: i64,
) -> (F, Accuracy) {
    let (mut root, _) = z.round_nearest(prec);
    let mut ord = cmp_square(&root, x);

    if ord != Ordering::Equal {
        // Move toward the exact root: up if root^2 < x.
        let up = ord == Ordering::Less;
        let half = ulp(&root, prec, up) - 1;
        let midpoint = step(&root, half, up, prec + 2);
        // The square of a midpoint is never equal to x.
        if cmp_square(&midpoint, x) == ord {
            let (next, _) = step(&root, half + 1, up, prec + 2).round_nearest(prec);
            root = next;
            ord = cmp_square(&root, x);
        }
    }

    let accuracy = match ord {
        Ordering::Less => Accuracy::RoundedDown,
        Ordering::Equal => Accuracy::Exact,
        Ordering::Greater => Accuracy::RoundedUp,
    };
    log::trace!("sqrt: rounded to {} bits, {}", prec, accuracy.as_str());
    (root.scale_exact(half_exp), accuracy)
}

#[test]
fn test_finalize_exact_root() {
    use crate::Float;

    let x = Float::from_f64(2.25);
    let z = Float::from_f64(1.5).cast(117);
    let (root, acc) = finalize(&x, &z, 53, 3);
    assert_eq!(root.get_precision(), 53);
    assert_eq!(root.as_f64(), 12.0);
    assert_eq!(acc, Accuracy::Exact);
}

#[cfg(feature = "std")]
#[test]
fn test_finalize_fixes_one_ulp() {
    use crate::Float;
    use core::f64::consts::SQRT_2;

    let x = Float::from_u64(53, 2);
    let above = Float::from_f64(SQRT_2 + f64::EPSILON);
    let below = Float::from_f64(SQRT_2 - f64::EPSILON);
    for z in [above, below, Float::from_f64(SQRT_2)] {
        let (root, acc) = finalize(&x, &z.cast(117), 53, 0);
        assert_eq!(root.as_f64(), SQRT_2);
        assert_eq!(acc, Accuracy::RoundedUp);
    }

    // Neighbors of a power of two: sqrt(4 - 2^-50) is just below 2.
    let x = Float::from_f64(4.0 - (2.0f64).powi(-50));
    let z = Float::from_f64(2.0).cast(117);
    let (root, acc) = finalize(&x, &z, 53, 0);
    assert_eq!(root.as_f64(), 2.0 - (2.0f64).powi(-52));
    assert_eq!(acc, Accuracy::RoundedUp);
}

#[cfg(feature = "std")]
#[test]
fn test_finalize_narrow_precision() {
    use crate::Float;

    // A 24-bit result from a wide iterate.
    let x = Float::from_f64(3.0).cast(24);
    let z = Float::parse(88, "1.7320508075688772935274463415058723669428").unwrap();
    let (root, acc) = finalize(&x, &z, 24, -2);
    assert_eq!(root.get_precision(), 24);
    assert_eq!(root.as_f32(), 3.0f32.sqrt() / 4.0);
    assert_ne!(acc, Accuracy::Exact);
}
