//! Add, subtract, multiply and divide with correct rounding. The result of
//! each operation has the larger of the two operand precisions.

use super::bigint::{BigInt, Loss};
use super::float::{Accuracy, Category, Float, RoundingMode};
use core::cmp::Ordering;
use core::ops::{Add, Div, Mul, Sub};

/// Extra low bits used when aligning the addends: guard, round and sticky.
const ALIGN_BITS: usize = 3;

impl Float {
    /// Returns this number converted (exactly) to a precision of at least
    /// `prec` bits.
    fn widen(&self, prec: usize) -> Self {
        if self.get_precision() >= prec {
            return self.clone();
        }
        self.cast(prec)
    }

    /// An inner function that performs the addition and subtraction of normal
    /// numbers (no NaN, Inf, Zeros). Both numbers must have the same
    /// precision. The smaller addend is shifted into three extra low bits,
    /// and everything below them is collapsed into a sticky bit, which is
    /// enough for correct rounding in every mode.
    /// See Pg 247.  Chapter 8. Algorithms for the Five Basic Operations.
    fn add_or_sub_normals(a: &Self, b: &Self, subtract: bool) -> Self {
        let prec = a.get_precision();
        debug_assert_eq!(prec, b.get_precision());

        let a_neg = a.get_sign();
        let b_neg = b.get_sign() ^ subtract;
        let (big, big_neg, small, small_neg) = if a.get_exp() >= b.get_exp() {
            (a, a_neg, b, b_neg)
        } else {
            (b, b_neg, a, a_neg)
        };

        let mut big_m = big.get_mantissa();
        big_m.shift_left(ALIGN_BITS);
        let mut small_m = small.get_mantissa();
        small_m.shift_left(ALIGN_BITS);

        // Align the smaller number, and OR the lost bits into the sticky bit.
        let bits = (big.get_exp() - small.get_exp()) as u64;
        let bits = bits.min((prec + ALIGN_BITS + 1) as u64) as usize;
        let loss = small_m.loss_below(bits);
        small_m.shift_right(bits);
        if !loss.is_zero() && !small_m.is_odd() {
            small_m.inplace_add(&BigInt::one());
        }

        let exp = big.get_exp() - ALIGN_BITS as i64;
        if big_neg == small_neg {
            let sum = big_m + &small_m;
            return Self::raw(prec, big_neg, exp, sum, Category::Normal);
        }

        match big_m.cmp(&small_m) {
            Ordering::Equal => Self::zero(prec, false),
            Ordering::Greater => {
                let diff = big_m - &small_m;
                Self::raw(prec, big_neg, exp, diff, Category::Normal)
            }
            Ordering::Less => {
                let diff = small_m - &big_m;
                Self::raw(prec, small_neg, exp, diff, Category::Normal)
            }
        }
    }

    /// Computes a+b using the rounding mode `rm`.
    pub fn add_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> (Self, Accuracy) {
        Self::add_sub(a, b, false, rm)
    }

    /// Computes a-b using the rounding mode `rm`.
    pub fn sub_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> (Self, Accuracy) {
        Self::add_sub(a, b, true, rm)
    }

    fn add_sub(
        a: &Self,
        b: &Self,
        subtract: bool,
        rm: RoundingMode,
    ) -> (Self, Accuracy) {
        let prec = a.get_precision().max(b.get_precision());
        let b_sign = b.get_sign() ^ subtract;

        // Table 8.2: Specification of addition for positive floating-point
        // data. Pg 247.
        match (a.get_category(), b.get_category()) {
            (Category::NaN, _) => (Self::nan(prec, a.get_sign()), Accuracy::Exact),
            (_, Category::NaN) => (Self::nan(prec, b.get_sign()), Accuracy::Exact),

            (Category::Infinity, Category::Infinity) => {
                if a.get_sign() != b_sign {
                    return (Self::nan(prec, false), Accuracy::Exact);
                }
                (Self::inf(prec, a.get_sign()), Accuracy::Exact)
            }
            (Category::Infinity, _) => (Self::inf(prec, a.get_sign()), Accuracy::Exact),
            (_, Category::Infinity) => (Self::inf(prec, b_sign), Accuracy::Exact),

            (Category::Zero, Category::Zero) => {
                // -0 only comes out of (-0) + (-0), or of rounding down.
                let sign = if a.get_sign() == b_sign {
                    a.get_sign()
                } else {
                    rm == RoundingMode::Negative
                };
                (Self::zero(prec, sign), Accuracy::Exact)
            }
            (Category::Normal, Category::Zero) => (a.widen(prec), Accuracy::Exact),
            (Category::Zero, Category::Normal) => {
                let mut r = b.widen(prec);
                r.set_sign(b_sign);
                (r, Accuracy::Exact)
            }

            (Category::Normal, Category::Normal) => {
                let a = a.widen(prec);
                let b = b.widen(prec);
                let mut res = Self::add_or_sub_normals(&a, &b, subtract);
                if res.is_zero() {
                    res.set_sign(rm == RoundingMode::Negative);
                    return (res, Accuracy::Exact);
                }
                let acc = res.normalize(rm, Loss::Zero);
                (res, acc)
            }
        }
    }
}

impl Float {
    /// Compute a*b using the rounding mode `rm`.
    pub fn mul_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> (Self, Accuracy) {
        let prec = a.get_precision().max(b.get_precision());
        let sign = a.get_sign() ^ b.get_sign();

        // Table 8.4: Specification of multiplication for floating-point data of
        // positive sign. Page 251.
        match (a.get_category(), b.get_category()) {
            (Category::NaN, _) => (Self::nan(prec, a.get_sign()), Accuracy::Exact),
            (_, Category::NaN) => (Self::nan(prec, b.get_sign()), Accuracy::Exact),
            (Category::Zero, Category::Infinity)
            | (Category::Infinity, Category::Zero) => {
                (Self::nan(prec, sign), Accuracy::Exact)
            }
            (Category::Infinity, _) | (_, Category::Infinity) => {
                (Self::inf(prec, sign), Accuracy::Exact)
            }
            (Category::Zero, _) | (_, Category::Zero) => {
                (Self::zero(prec, sign), Accuracy::Exact)
            }
            (Category::Normal, Category::Normal) => {
                // The product of the significands is exact. With
                // a = ma * 2^(ea - pa + 1) and b = mb * 2^(eb - pb + 1), the
                // product has the exponent ea + eb - pa - pb + 2, which is
                // (exp - prec + 1) for exp = ea + eb + prec + 1 - pa - pb.
                let ab = a.get_mantissa() * &b.get_mantissa();
                let exp = a.get_exp() + b.get_exp() + (prec as i64 + 1)
                    - a.get_precision() as i64
                    - b.get_precision() as i64;
                let mut res = Self::raw(prec, sign, exp, ab, Category::Normal);
                let acc = res.normalize(rm, Loss::Zero);
                (res, acc)
            }
        }
    }
}

impl Float {
    /// Compute a/b, with the rounding mode `rm`.
    pub fn div_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> (Self, Accuracy) {
        let prec = a.get_precision().max(b.get_precision());
        let sign = a.get_sign() ^ b.get_sign();
        // Table 8.5: Special values for x/y - Page 263.
        match (a.get_category(), b.get_category()) {
            (Category::NaN, _)
            | (_, Category::NaN)
            | (Category::Zero, Category::Zero)
            | (Category::Infinity, Category::Infinity) => {
                (Self::nan(prec, sign), Accuracy::Exact)
            }
            (_, Category::Infinity) => (Self::zero(prec, sign), Accuracy::Exact),
            (Category::Zero, _) => (Self::zero(prec, sign), Accuracy::Exact),
            (_, Category::Zero) => (Self::inf(prec, sign), Accuracy::Exact),
            (Category::Infinity, _) => (Self::inf(prec, sign), Accuracy::Exact),
            (Category::Normal, Category::Normal) => {
                let a = a.widen(prec);
                let b = b.widen(prec);
                let mut res = Self::div_normals(&a, &b);
                let acc = res.normalize(rm, Loss::Zero);
                (res, acc)
            }
        }
    }

    /// Compute a/b, where both `a` and `b` are normals of the same
    /// precision. The quotient is computed with at least two bits beyond the
    /// precision, and a non-zero remainder becomes a sticky bit below them.
    /// Page 262 8.6. Floating-Point Division.
    fn div_normals(a: &Self, b: &Self) -> Self {
        let prec = a.get_precision();
        debug_assert_eq!(prec, b.get_precision());
        let sign = a.get_sign() ^ b.get_sign();

        // Both significands have the MSB at bit 'prec', so their ratio is in
        // (1/2, 2), and the quotient below has prec+2 or prec+3 bits.
        let mut quotient = a.get_mantissa();
        quotient.shift_left(prec + 2);
        let reminder = quotient.inplace_div(&b.get_mantissa());

        // The quotient is a/b * 2^(prec+2). Find the exponent of the lsb.
        let mut exp = a.get_exp() - b.get_exp() - 3;
        if !reminder.is_zero() {
            quotient.shift_left(1);
            quotient.inplace_add(&BigInt::one());
            exp -= 1;
        }
        Self::raw(prec, sign, exp, quotient, Category::Normal)
    }
}

impl Add for &Float {
    type Output = Float;
    fn add(self, rhs: Self) -> Float {
        Float::add_with_rm(self, rhs, RoundingMode::NearestTiesToEven).0
    }
}

impl Sub for &Float {
    type Output = Float;
    fn sub(self, rhs: Self) -> Float {
        Float::sub_with_rm(self, rhs, RoundingMode::NearestTiesToEven).0
    }
}

impl Mul for &Float {
    type Output = Float;
    fn mul(self, rhs: Self) -> Float {
        Float::mul_with_rm(self, rhs, RoundingMode::NearestTiesToEven).0
    }
}

impl Div for &Float {
    type Output = Float;
    fn div(self, rhs: Self) -> Float {
        Float::div_with_rm(self, rhs, RoundingMode::NearestTiesToEven).0
    }
}

macro_rules! declare_owned_operator {
    ($trait_name:ident, $func_name:ident) => {
        impl $trait_name for Float {
            type Output = Float;
            fn $func_name(self, rhs: Self) -> Float {
                (&self).$func_name(&rhs)
            }
        }
    };
}

declare_owned_operator!(Add, add);
declare_owned_operator!(Sub, sub);
declare_owned_operator!(Mul, mul);
declare_owned_operator!(Div, div);

#[test]
fn test_addition() {
    fn add_helper(a: f64, b: f64) -> f64 {
        (Float::from_f64(a) + Float::from_f64(b)).as_f64()
    }

    assert_eq!(add_helper(0., -4.), -4.);
    assert_eq!(add_helper(-4., 0.), -4.);
    assert_eq!(add_helper(1., 1.), 2.);
    assert_eq!(add_helper(128., -8.), 120.);
    assert_eq!(add_helper(64., -65.), -1.);
    assert_eq!(add_helper(-64., -65.), -129.);
    assert_eq!(add_helper(-15., 15.), 0.);
    assert!(!(Float::from_f64(-15.) + Float::from_f64(15.)).is_negative());

    for i in -4..15 {
        for j in i..15 {
            assert_eq!(
                add_helper(f64::from(j), f64::from(i)),
                f64::from(i) + f64::from(j)
            );
        }
    }
}

// Pg 120.  Chapter 4. Basic Properties and Algorithms.
#[test]
fn test_addition_large_numbers() {
    let one = Float::from_i64(53, 1);
    let mut a = Float::from_i64(53, 1);

    while &(&a + &one) - &a == one {
        a = &a + &a;
    }

    let mut b = one.clone();
    while &(&a + &b) - &a != b {
        b = &b + &one;
    }

    assert_eq!(a.as_f64(), 9007199254740992.);
    assert_eq!(b.as_f64(), 2.);
}

#[test]
fn test_arith_random_vals() {
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new();

    // Compare against the hardware on normal numbers of moderate range, so
    // that the f64 results are not denormal.
    let next = |lfsr: &mut Lfsr| -> f64 {
        let bits = lfsr.next_u64();
        let exp = (bits >> 52) % 200 + 923;
        f64::from_bits((bits & (1 << 63)) | (exp << 52) | (bits & ((1 << 52) - 1)))
    };

    for _ in 0..20000 {
        let f0 = next(&mut lfsr);
        let f1 = next(&mut lfsr);
        let a = Float::from_f64(f0);
        let b = Float::from_f64(f1);
        assert_eq!((&a + &b).as_f64().to_bits(), (f0 + f1).to_bits());
        assert_eq!((&a - &b).as_f64().to_bits(), (f0 - f1).to_bits());
        assert_eq!((&a * &b).as_f64().to_bits(), (f0 * f1).to_bits());
        assert_eq!((&a / &b).as_f64().to_bits(), (f0 / f1).to_bits());
    }
}

#[test]
fn test_add_sub_wide_exponent_gap() {
    // The sticky bit must not carry into the guard bits when the lowest
    // aligned bit is already set.
    let a = 1.749174255752618f64;
    let b = 1.4283298839956496e-15f64;
    let fa = Float::from_f64(a);
    let fb = Float::from_f64(b);
    assert_eq!((&fa + &fb).as_f64(), 1.7491742557526193);
    assert_eq!((&fa + &fb).as_f64().to_bits(), (a + b).to_bits());
    assert_eq!((&fa - &fb).as_f64().to_bits(), (a - b).to_bits());

    use crate::utils::Lfsr;
    let mut lfsr = Lfsr::new_with_seed(9);
    for _ in 0..20000 {
        let f0 = 1.0 + lfsr.next_unit_f64();
        let gap = 4 + lfsr.next_u64() % 60;
        let mut f1 = (1.0 + lfsr.next_unit_f64()) / (1u64 << gap) as f64;
        if lfsr.next_u64() & 1 == 1 {
            f1 = -f1;
        }
        let a = Float::from_f64(f0);
        let b = Float::from_f64(f1);
        assert_eq!((&a + &b).as_f64().to_bits(), (f0 + f1).to_bits(), "{} + {}", f0, f1);
        assert_eq!((&a - &b).as_f64().to_bits(), (f0 - f1).to_bits(), "{} - {}", f0, f1);
        assert_eq!((&b - &a).as_f64().to_bits(), (f1 - f0).to_bits(), "{} - {}", f1, f0);
    }
}

#[test]
fn test_arith_accuracy() {
    let one = Float::from_u64(53, 1);
    let three = Float::from_u64(53, 3);
    let (third, acc) = Float::div_with_rm(&one, &three, RoundingMode::NearestTiesToEven);
    assert_eq!(third.as_f64(), 1.0 / 3.0);
    assert_eq!(acc, Accuracy::RoundedDown);

    let (up, acc) = Float::div_with_rm(&one, &three, RoundingMode::Positive);
    assert_eq!(acc, Accuracy::RoundedUp);
    assert!(up > third);

    let (_, acc) = Float::mul_with_rm(&three, &three, RoundingMode::NearestTiesToEven);
    assert_eq!(acc, Accuracy::Exact);

    // 1 + 2^-60 does not fit in 53 bits.
    let tiny = Float::from_parts(53, false, -60, BigInt::one_hot(52));
    let (sum, acc) = Float::add_with_rm(&one, &tiny, RoundingMode::NearestTiesToEven);
    assert_eq!(sum, one);
    assert_eq!(acc, Accuracy::RoundedDown);
    let (diff, acc) = Float::sub_with_rm(&one, &tiny, RoundingMode::Zero);
    assert!(diff < one);
    assert_eq!(acc, Accuracy::RoundedDown);
}

#[test]
fn test_mixed_precision() {
    // The result has the wider precision.
    let a = Float::from_u64(10, 1);
    let b = Float::from_parts(200, false, -150, BigInt::one_hot(199));
    let c = &a + &b;
    assert_eq!(c.get_precision(), 200);
    assert!(c > a);
    let d = &c - &a;
    assert_eq!(d, b);
}

#[test]
fn test_div_special_values() {
    use crate::utils;

    for v0 in utils::edge_values() {
        for v1 in utils::edge_values() {
            let r0 = (Float::from_f64(v0) / Float::from_f64(v1)).as_f64();
            let r1 = v0 / v1;
            assert_eq!(r0.is_nan(), r1.is_nan());
            assert_eq!(r0.is_infinite(), r1.is_infinite());
            // Check that the results are bit identical, or are both NaN.
            assert!(r1.is_nan() || r0.to_bits() == r1.to_bits());
        }
    }
}
