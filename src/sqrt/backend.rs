use super::SqrtFloat;
use crate::float::{Accuracy, Category, Float, RoundingMode};
use core::cmp::Ordering;

impl SqrtFloat for Float {
    fn precision(&self) -> usize {
        self.get_precision()
    }

    fn category(&self) -> Category {
        self.get_category()
    }

    fn is_negative(&self) -> bool {
        self.get_sign()
    }

    fn special(category: Category, prec: usize, negative: bool) -> Self {
        match category {
            Category::Zero => Float::zero(prec, negative),
            Category::Infinity => Float::inf(prec, negative),
            Category::NaN => Float::nan(prec, negative),
            Category::Normal => Float::one(prec, negative),
        }
    }

    fn exponent(&self) -> i64 {
        self.get_exp()
    }

    fn scale_exact(&self, k: i64) -> Self {
        self.scale(k)
    }

    fn to_f64_nearest(&self) -> f64 {
        self.as_f64()
    }

    fn from_f64_exact(val: f64) -> Self {
        Float::from_f64(val)
    }

    fn round_nearest(&self, prec: usize) -> (Self, Accuracy) {
        self.cast_with_rm(prec, RoundingMode::NearestTiesToEven)
    }

    fn add_nearest(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn mul_nearest(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn div_nearest(&self, rhs: &Self) -> Self {
        self / rhs
    }

    fn cmp_normal(&self, rhs: &Self) -> Ordering {
        // The core only compares normal values.
        match self.partial_cmp(rhs) {
            Some(ord) => ord,
            None => unreachable!("NaN passed to a normal comparison"),
        }
    }
}

#[test]
fn test_backend_capabilities() {
    let x = Float::from_f64(6.0);
    assert_eq!(x.precision(), 53);
    assert_eq!(x.exponent(), 2);
    assert_eq!(x.scale_exact(-2).to_f64_nearest(), 1.5);

    let (narrow, acc) = Float::from_f64(1.0 / 3.0).round_nearest(10);
    assert_eq!(narrow.precision(), 10);
    assert_eq!(acc, Accuracy::RoundedUp);

    let three = Float::from_u64(200, 3);
    let third = Float::one(200, false).div_nearest(&three);
    assert_eq!(third.precision(), 200);
    assert_eq!(third.cmp_normal(&Float::one(7, false)), Ordering::Less);
    assert_eq!(third.cmp_normal(&third.round_nearest(300).0), Ordering::Equal);
    assert_eq!(third.add_nearest(&third).add_nearest(&third).to_f64_nearest(), 1.0);

    let inf = <Float as SqrtFloat>::special(Category::Infinity, 77, true);
    assert!(inf.is_inf() && inf.is_negative());
    assert_eq!(inf.precision(), 77);
}

#[test]
#[should_panic(expected = "NaN passed to a normal comparison")]
fn test_cmp_normal_rejects_nan() {
    let nan = Float::nan(53, false);
    nan.cmp_normal(&Float::one(53, false));
}
