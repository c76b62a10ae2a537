use super::SqrtFloat;

/// One Newton step for z^2 = x, at the working precision `prec`:
/// z <- (z + x / z) / 2. The division and the addition round to the nearest
/// even at `prec`, and the halving is exact.
pub(super) fn newton_step<F: SqrtFloat>(x: &F, z: &F, prec: usize) -> F {
    let (xp, _) = x.round_nearest(prec);
    let (zp, _) = z.round_nearest(prec);
    let quotient = xp.div_nearest(&zp);
    zp.add_nearest(&quotient).scale_exact(-1)
}

/// Run one Newton step per entry of the precision `schedule`, starting at
/// `seed`. The number of steps is fixed by the schedule.
pub(super) fn iterate<F: SqrtFloat>(x: &F, seed: F, schedule: &[usize]) -> F {
    schedule
        .iter()
        .fold(seed, |z, &prec| newton_step(x, &z, prec))
}

#[cfg(test)]
fn sqrt2_error_bits(z: &crate::Float) -> i64 {
    use crate::Float;

    // 2^-1000 relative accuracy is more than any of the tests below need.
    let reference = Float::parse(1100, "1.41421356237309504880168872420969807856967187537694807317667973799073247846210703885038753432764157273501384623091229702492483605585073721264412149709993583141322266592750559275579995050115278206057147010955997160597027453459686201472851741864088919860955232923048430871432145083976260362799525140798968725339654633180882964062061525835239505474575028").unwrap();
    let diff = z.cast(1100) - reference;
    if diff.is_zero() {
        return i64::MIN;
    }
    diff.get_exp()
}

#[test]
fn test_newton_doubles_bits() {
    use crate::Float;

    let two = Float::from_u64(1000, 2);
    let seed = Float::from_f64(core::f64::consts::SQRT_2);
    assert!(sqrt2_error_bits(&seed) < -52);

    let z = newton_step(&two, &seed, 106);
    assert_eq!(z.get_precision(), 106);
    assert!(sqrt2_error_bits(&z) < -100);

    let z = newton_step(&two, &z, 212);
    assert!(sqrt2_error_bits(&z) < -200);

    let z = iterate(&two, seed, &[106, 212, 424, 848, 1000, 1000]);
    assert_eq!(z.get_precision(), 1000);
    assert!(sqrt2_error_bits(&z) < -995);
}

#[test]
fn test_newton_rounds_the_operand() {
    use crate::Float;

    // The operand is wider than the working precision.
    let x = Float::parse(500, "2.0000000000000000000000000000000000000000000001").unwrap();
    let seed = Float::from_f64(core::f64::consts::SQRT_2);
    let z = newton_step(&x, &seed, 106);
    assert_eq!(z.get_precision(), 106);
    assert!(sqrt2_error_bits(&z) < -100);
}
