extern crate alloc;

use super::{GUARD_BITS, SEED_PRECISION, SETTLE_PASSES};
use alloc::vec::Vec;

/// Returns the working precisions of the Newton steps for a result with
/// `prec` bits. Each Newton step doubles the number of correct bits, so the
/// precision doubles from the 53-bit seed until it reaches `prec` plus the
/// guard bits. A few extra steps run at the final precision.
///
/// ```
///    use sqrtfloat::precision_schedule;
///
///    assert_eq!(precision_schedule(53), [106, 117, 117, 117]);
///    assert_eq!(precision_schedule(24), [88, 88, 88]);
/// ```
pub fn precision_schedule(prec: usize) -> Vec<usize> {
    let target = prec + GUARD_BITS;
    let mut schedule = Vec::new();
    let mut p = SEED_PRECISION;
    while p < target {
        p = (2 * p).min(target);
        schedule.push(p);
    }
    schedule.extend(core::iter::repeat(target).take(SETTLE_PASSES));
    log::trace!(
        "sqrt: precision {} uses {} newton steps, up to {} bits",
        prec,
        schedule.len(),
        target
    );
    schedule
}

#[test]
fn test_schedule_shape() {
    for prec in [1, 24, 53, 64, 100, 1000, 4000, 100_000] {
        let s = precision_schedule(prec);
        let target = prec + GUARD_BITS;
        assert_eq!(s[s.len() - 1], target);
        assert_eq!(s[s.len() - 2], target);
        assert_eq!(s[s.len() - 3], target);
        // The precision never grows faster than the bits that Newton fixes.
        let mut prev = SEED_PRECISION;
        for &p in s.iter() {
            assert!(p >= prev && p <= 2 * prev);
            prev = p;
        }
    }
}

#[cfg(feature = "std")]
#[test]
fn test_schedule_length() {
    assert_eq!(precision_schedule(1000), [106, 212, 424, 848, 1064, 1064, 1064]);
    // log2(T/53) + O(1) steps.
    for prec in [100, 1000, 10_000, 1_000_000] {
        let target = (prec + GUARD_BITS) as f64;
        let bound = (target / SEED_PRECISION as f64).log2().ceil() as usize;
        assert!(precision_schedule(prec).len() <= bound + SETTLE_PASSES);
    }
}
