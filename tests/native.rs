//! Square roots at 24 and 53 bits must reproduce the hardware square root of
//! f32 and f64 bit for bit.

use sqrtfloat::{Accuracy, Float, Lfsr};

const SAMPLES: usize = 100_000;

fn check_f32(factor: f32, seed: u64) {
    let mut lfsr = Lfsr::new_with_seed(seed);
    for _ in 0..SAMPLES {
        let v = lfsr.next_unit_f32() * factor;
        let (root, _) = Float::from_f32(v).sqrt().unwrap();
        assert_eq!(root.get_precision(), 24);
        let (res, acc) = root.to_f32();
        assert_eq!(acc, Accuracy::Exact);
        assert_eq!(res.to_bits(), v.sqrt().to_bits(), "sqrt({:e})", v);
    }
}

fn check_f64(factor: f64, seed: u64) {
    let mut lfsr = Lfsr::new_with_seed(seed);
    for _ in 0..SAMPLES {
        let v = lfsr.next_unit_f64() * factor;
        let (root, _) = Float::from_f64(v).sqrt().unwrap();
        assert_eq!(root.get_precision(), 53);
        let (res, acc) = root.to_f64();
        assert_eq!(acc, Accuracy::Exact);
        assert_eq!(res.to_bits(), v.sqrt().to_bits(), "sqrt({:e})", v);
    }
}

#[test]
fn test_native_f32_small_range() {
    check_f32(10.0, 0x1234);
}

#[test]
fn test_native_f32_tiny() {
    check_f32(1e-30, 0x2345);
}

#[test]
fn test_native_f32_huge() {
    check_f32(1e30, 0x3456);
}

#[test]
fn test_native_f64_small_range() {
    check_f64(10.0, 0x4567);
}

#[test]
fn test_native_f64_tiny() {
    check_f64(1e-300, 0x5678);
}

#[test]
fn test_native_f64_huge() {
    check_f64(1e300, 0x6789);
}

#[test]
fn test_native_accuracy() {
    // The reported direction agrees with the exact square.
    let mut lfsr = Lfsr::new();
    for _ in 0..10_000 {
        let v = lfsr.next_unit_f64() * 100.0;
        let x = Float::from_f64(v);
        let (root, acc) = x.sqrt().unwrap();
        let wide = root.cast(106);
        let square = &wide * &wide;
        let expected = match square.partial_cmp(&x).unwrap() {
            core::cmp::Ordering::Less => Accuracy::RoundedDown,
            core::cmp::Ordering::Equal => Accuracy::Exact,
            core::cmp::Ordering::Greater => Accuracy::RoundedUp,
        };
        assert_eq!(acc, expected, "sqrt({:e})", v);
    }
}

#[test]
fn test_native_perfect_squares() {
    for i in 1..2000u64 {
        let x = Float::from_u64(53, i * i);
        let (root, acc) = x.sqrt().unwrap();
        assert_eq!(root, Float::from_u64(53, i));
        assert_eq!(acc, Accuracy::Exact);
    }
}
