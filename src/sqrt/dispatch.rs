use super::SqrtFloat;
use crate::error::SqrtError;
use crate::float::{Accuracy, Category};

/// The result of classifying the input of the square root.
pub(super) enum Classified<F> {
    /// The input has a trivial root.
    Done(F, Accuracy),
    /// The input is a positive normal number, and needs the iteration.
    Normal,
}

/// Handles the special values: NaN, zeros, infinities and negative numbers.
/// This is the only place where the square root can fail.
pub(super) fn classify<F: SqrtFloat>(x: &F) -> Result<Classified<F>, SqrtError> {
    let prec = x.precision();
    let negative = x.is_negative();
    match x.category() {
        Category::NaN => Ok(Classified::Done(
            F::special(Category::NaN, prec, negative),
            Accuracy::Exact,
        )),
        // sqrt(-0) = -0.
        Category::Zero => Ok(Classified::Done(
            F::special(Category::Zero, prec, negative),
            Accuracy::Exact,
        )),
        _ if negative => Err(SqrtError::Domain),
        Category::Infinity => Ok(Classified::Done(
            F::special(Category::Infinity, prec, false),
            Accuracy::Exact,
        )),
        Category::Normal => Ok(Classified::Normal),
    }
}

#[cfg(test)]
fn done(x: &crate::Float) -> (crate::Float, Accuracy) {
    match classify(x) {
        Ok(Classified::Done(v, acc)) => (v, acc),
        _ => panic!("expected a trivial root"),
    }
}

#[test]
fn test_classify_special_values() {
    use crate::Float;

    for prec in [1, 24, 53, 300] {
        let (v, acc) = done(&Float::nan(prec, true));
        assert!(v.is_nan());
        assert_eq!(v.get_precision(), prec);
        assert_eq!(acc, Accuracy::Exact);

        let (v, _) = done(&Float::zero(prec, true));
        assert!(v.is_zero() && v.is_negative());
        let (v, _) = done(&Float::zero(prec, false));
        assert!(v.is_zero() && !v.is_negative());

        let (v, acc) = done(&Float::inf(prec, false));
        assert!(v.is_inf() && !v.is_negative());
        assert_eq!(v.get_precision(), prec);
        assert_eq!(acc, Accuracy::Exact);

        assert!(matches!(
            classify(&Float::inf(prec, true)),
            Err(SqrtError::Domain)
        ));
        assert!(matches!(
            classify(&Float::one(prec, true)),
            Err(SqrtError::Domain)
        ));
        assert!(matches!(
            classify(&Float::one(prec, false)),
            Ok(Classified::Normal)
        ));
    }
}
