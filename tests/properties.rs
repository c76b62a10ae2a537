//! Properties of the square root that hold at every precision.

use sqrtfloat::{
    precision_schedule, sqrt, Accuracy, Category, Float, Lfsr, SqrtError, EXP_MAX, EXP_MIN,
};
use std::cmp::Ordering;

const PRECISIONS: [usize; 8] = [2, 11, 24, 53, 64, 113, 256, 1000];

/// Returns a random normal number with `prec` bits, in [1, 2^`span`).
fn random_float(lfsr: &mut Lfsr, prec: usize, span: u64) -> Float {
    let mut mantissa = Float::from_u64(prec, 1);
    let mut bits = 0;
    // Fill the significand 60 bits at a time.
    while bits < prec {
        let chunk = Float::from_u64(prec + 64, lfsr.next_u64() >> 4).scale(-(bits as i64) - 60);
        mantissa = (&mantissa.cast(prec + 64) + &chunk).cast(prec);
        bits += 60;
    }
    let exp = (lfsr.next_u64() % span.max(1)) as i64;
    mantissa.scale(exp)
}

#[test]
fn test_special_values() {
    for prec in PRECISIONS {
        let nan = Float::nan(prec, false);
        let (root, acc) = nan.sqrt().unwrap();
        assert!(root.is_nan());
        assert_eq!(acc, Accuracy::Exact);

        let (root, _) = Float::nan(prec, true).sqrt().unwrap();
        assert!(root.is_nan());

        let (root, acc) = Float::inf(prec, false).sqrt().unwrap();
        assert!(root.is_inf() && !root.is_negative());
        assert_eq!(root.get_precision(), prec);
        assert_eq!(acc, Accuracy::Exact);

        for sign in [false, true] {
            let (root, acc) = Float::zero(prec, sign).sqrt().unwrap();
            assert!(root.is_zero());
            assert_eq!(root.is_negative(), sign);
            assert_eq!(root.get_precision(), prec);
            assert_eq!(acc, Accuracy::Exact);
        }
    }
}

#[test]
fn test_domain_errors() {
    for prec in PRECISIONS {
        for val in [
            Float::inf(prec, true),
            Float::from_i64(prec, -1),
            Float::from_i64(prec, -4),
            Float::one(prec, true).scale(-1000),
            Float::one(prec, true).scale(1000),
        ] {
            assert_eq!(val.sqrt(), Err(SqrtError::Domain));
            assert_eq!(sqrt(&val), Err(SqrtError::Domain));
        }
    }
    assert_eq!(
        SqrtError::Domain.to_string(),
        "square root of a negative number"
    );
}

#[test]
fn test_precision_is_preserved() {
    let mut lfsr = Lfsr::new();
    for prec in PRECISIONS {
        for _ in 0..20 {
            let x = random_float(&mut lfsr, prec, 100);
            let (root, _) = x.sqrt().unwrap();
            assert_eq!(root.get_precision(), prec);
            assert_eq!(root.get_category(), Category::Normal);
            assert!(!root.is_negative());
        }
    }
}

#[test]
fn test_correct_rounding() {
    // The exact root lies within half an ulp of the result, which means the
    // squares of the two midpoints bracket the input.
    let mut lfsr = Lfsr::new_with_seed(7);
    for prec in PRECISIONS {
        for _ in 0..50 {
            let x = random_float(&mut lfsr, prec, 64);
            let (root, acc) = x.sqrt().unwrap();
            let wide = 2 * prec + 8;
            let half_ulp = Float::one(wide, false).scale(root.get_exp() - prec as i64);
            let root = root.cast(wide);
            let low = &root - &half_ulp;
            let high = &root + &half_ulp;
            assert!(&low * &low <= x, "prec = {}, x = {}", prec, x);
            assert!(&high * &high >= x, "prec = {}, x = {}", prec, x);

            let square = &root * &root;
            let expected = match square.partial_cmp(&x).unwrap() {
                Ordering::Less => Accuracy::RoundedDown,
                Ordering::Equal => Accuracy::Exact,
                Ordering::Greater => Accuracy::RoundedUp,
            };
            assert_eq!(acc, expected);
        }
    }
}

#[test]
fn test_square_round_trip() {
    // The square of the root, rounded to the precision of the input, is
    // within one ulp of the input.
    let mut lfsr = Lfsr::new_with_seed(17);
    for prec in PRECISIONS {
        let wide = 2 * prec + 8;
        for _ in 0..50 {
            let x = random_float(&mut lfsr, prec, 64);
            let (root, _) = x.sqrt().unwrap();
            let square = &root * &root;
            assert_eq!(square.get_precision(), prec);
            let ulp = Float::one(wide, false).scale(x.get_exp() - prec as i64 + 1);
            let diff = &square.cast(wide) - &x.cast(wide);
            assert!(diff <= ulp && diff >= ulp.neg(), "prec = {}, x = {}", prec, x);
        }
    }
}

#[test]
fn test_exact_squares() {
    let mut lfsr = Lfsr::new_with_seed(11);
    for prec in [24, 53, 100, 500] {
        for _ in 0..20 {
            // A root with half the bits has an exact square.
            let r = random_float(&mut lfsr, prec / 2, 40).scale(-20);
            let r = r.cast(prec);
            let x = &r * &r;
            let (root, acc) = x.sqrt().unwrap();
            assert_eq!(root, r);
            assert_eq!(acc, Accuracy::Exact);
        }
    }
}

#[test]
fn test_monotonic() {
    let mut lfsr = Lfsr::new_with_seed(3);
    for prec in PRECISIONS {
        for _ in 0..50 {
            let a = random_float(&mut lfsr, prec, 8);
            let b = random_float(&mut lfsr, prec, 8);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (r1, _) = lo.sqrt().unwrap();
            let (r2, _) = hi.sqrt().unwrap();
            assert!(r1 <= r2, "sqrt({}) > sqrt({})", lo, hi);
        }
        // Neighbors around one.
        let one = Float::one(prec, false);
        let ulp = Float::one(prec, false).scale(-(prec as i64));
        let below = (&one - &ulp).cast(prec);
        let above = (&one + &ulp.scale(1)).cast(prec);
        let (r0, _) = below.sqrt().unwrap();
        let (r1, _) = one.sqrt().unwrap();
        let (r2, _) = above.sqrt().unwrap();
        assert!(r0 <= r1 && r1 <= r2);
    }
}

#[test]
fn test_composable_precision() {
    // Rounding a wide root to a narrow precision gives the narrow root, when
    // the wide precision is at least twice the narrow one plus two.
    let mut lfsr = Lfsr::new_with_seed(5);
    for narrow in [8, 24, 53, 100] {
        let wide = 2 * narrow + 2;
        for _ in 0..100 {
            let x = random_float(&mut lfsr, narrow, 30);
            let (root, _) = x.sqrt().unwrap();
            let (wide_root, _) = x.cast(wide).sqrt().unwrap();
            assert_eq!(wide_root.cast(narrow), root, "x = {}", x);
        }
    }
}

#[test]
fn test_extreme_exponents() {
    for prec in [24, 53, 200] {
        let four = Float::from_u64(prec, 4);
        for k in [EXP_MAX - 3, EXP_MAX - 4, EXP_MIN + 2, EXP_MIN + 3, 1 << 20, -(1 << 20)] {
            let x = four.scale(k);
            assert!(x.is_normal());
            let (root, acc) = x.sqrt().unwrap();
            // sqrt(4 * 2^k) = 2 * 2^(k/2), with floor division.
            let half = k.div_euclid(2);
            let rest = k.rem_euclid(2);
            let expected = if rest == 0 {
                Float::from_u64(prec, 2).scale(half)
            } else {
                Float::from_u64(prec, 2).sqrt().unwrap().0.scale(half + 1)
            };
            assert_eq!(root, expected, "k = {}", k);
            assert_eq!(acc == Accuracy::Exact, rest == 0);
        }
    }
}

#[test]
fn test_display_of_roots() {
    let (root, acc) = Float::from_u64(53, 2).sqrt().unwrap();
    assert_eq!(root.to_string(), "1.4142135623730951");
    assert_eq!(root.to_f64(), (std::f64::consts::SQRT_2, Accuracy::Exact));
    assert_eq!(acc, Accuracy::RoundedUp);

    let (root, _) = Float::parse(53, "0.01").unwrap().sqrt().unwrap();
    assert_eq!(root.as_f64(), 0.1);
}

#[test]
fn test_schedule_is_public() {
    let s = precision_schedule(10_000);
    assert_eq!(*s.last().unwrap(), 10_064);
    assert!(s.len() < 12);
}

#[test]
fn test_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Float>();
    assert_send_sync::<SqrtError>();

    let handles: Vec<_> = (1..=8u64)
        .map(|i| {
            std::thread::spawn(move || {
                let x = Float::from_u64(300, i * i);
                x.sqrt().unwrap()
            })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let (root, acc) = h.join().unwrap();
        assert_eq!(root, Float::from_u64(300, i as u64 + 1));
        assert_eq!(acc, Accuracy::Exact);
    }
}
