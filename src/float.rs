//! The arbitrary-precision float that backs the square root, and the
//! rounding step that every operation ends with.

use super::bigint::{BigInt, Loss};
use core::cmp::Ordering;

/// The IEEE 754-2019 rounding-direction attributes (section 4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    NearestTiesToEven,
    NearestTiesToAway,
    Zero,
    Positive,
    Negative,
}

impl RoundingMode {
    /// Parses the name of a rounding mode, as spelled by the variants.
    pub fn from_string(s: &str) -> Option<Self> {
        Some(match s {
            "NearestTiesToEven" => Self::NearestTiesToEven,
            "NearestTiesToAway" => Self::NearestTiesToAway,
            "Zero" => Self::Zero,
            "Positive" => Self::Positive,
            "Negative" => Self::Negative,
            _ => return None,
        })
    }

    /// Returns true if a value with the sign `negative` that is too large
    /// for the format becomes an infinity, rather than the largest finite
    /// value.
    pub(crate) fn overflows_to_inf(&self, negative: bool) -> bool {
        match self {
            Self::NearestTiesToEven | Self::NearestTiesToAway => true,
            Self::Zero => false,
            Self::Positive => !negative,
            Self::Negative => negative,
        }
    }
}

/// The direction of a rounded result, relative to the exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accuracy {
    Exact,
    /// The result is below the exact value.
    RoundedDown,
    /// The result is above the exact value.
    RoundedUp,
}

impl Accuracy {
    /// The accuracy of an inexact value that was moved away from zero, or
    /// toward zero.
    pub(crate) fn from_direction(negative: bool, away: bool) -> Self {
        if away != negative {
            Accuracy::RoundedUp
        } else {
            Accuracy::RoundedDown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Accuracy::Exact => "Exact",
            Accuracy::RoundedDown => "RoundedDown",
            Accuracy::RoundedUp => "RoundedUp",
        }
    }
}

/// The kind of value that a [`Float`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Infinity,
    NaN,
    Normal,
    Zero,
}

/// The smallest exponent of a normal number. Smaller results flush to zero.
pub const EXP_MIN: i64 = i32::MIN as i64;
/// The largest exponent of a finite number. Larger results overflow.
pub const EXP_MAX: i64 = i32::MAX as i64;

/// A binary floating-point number with `prec` bits of significand.
///
/// A normal number has the value `1.mmm * 2^exp`, with the exponent in
/// [`EXP_MIN`]..=[`EXP_MAX`]. There are no denormals. Every number carries
/// its own precision, and the result of an operation has the larger
/// precision of its operands.
#[derive(Debug, Clone)]
pub struct Float {
    prec: usize,
    // True for negative numbers.
    sign: bool,
    exp: i64,
    // The significand, with the leading one at bit `prec` (1-based), so that
    // the raw value is mantissa * 2^(exp - prec + 1).
    mantissa: BigInt,
    category: Category,
}

impl Float {
    /// Creates a normal number from the integer significand `mantissa`, read
    /// as `mantissa * 2^(exp - prec + 1)`. A significand wider than `prec`
    /// rounds to the nearest even.
    pub fn from_parts(prec: usize, sign: bool, exp: i64, mantissa: BigInt) -> Self {
        let mut x = Self::raw(prec, sign, exp, mantissa, Category::Normal);
        x.normalize(RoundingMode::NearestTiesToEven, Loss::Zero);
        x
    }

    /// Creates a float from its fields, as is.
    pub(crate) fn raw(
        prec: usize,
        sign: bool,
        exp: i64,
        mantissa: BigInt,
        category: Category,
    ) -> Self {
        assert!(prec > 0, "the precision must be positive");
        Float {
            prec,
            sign,
            exp,
            mantissa,
            category,
        }
    }

    pub fn zero(prec: usize, sign: bool) -> Self {
        Self::raw(prec, sign, 0, BigInt::zero(), Category::Zero)
    }

    pub fn one(prec: usize, sign: bool) -> Self {
        Self::raw(prec, sign, 0, BigInt::one_hot(prec - 1), Category::Normal)
    }

    pub fn inf(prec: usize, sign: bool) -> Self {
        Self::raw(prec, sign, 0, BigInt::zero(), Category::Infinity)
    }

    pub fn nan(prec: usize, sign: bool) -> Self {
        Self::raw(prec, sign, 0, BigInt::zero(), Category::NaN)
    }

    pub fn is_negative(&self) -> bool {
        self.sign
    }

    pub fn is_inf(&self) -> bool {
        self.category == Category::Infinity
    }

    pub fn is_nan(&self) -> bool {
        self.category == Category::NaN
    }

    pub fn is_zero(&self) -> bool {
        self.category == Category::Zero
    }

    /// Returns true for finite nonzero numbers.
    pub fn is_normal(&self) -> bool {
        self.category == Category::Normal
    }

    /// Returns the number of bits in the significand.
    pub fn get_precision(&self) -> usize {
        self.prec
    }

    /// Sets the sign. True means negative.
    pub fn set_sign(&mut self, sign: bool) {
        self.sign = sign
    }

    pub fn get_sign(&self) -> bool {
        self.sign
    }

    pub fn get_mantissa(&self) -> BigInt {
        self.mantissa.clone()
    }

    /// Returns `e` for a normal number `1.mmm * 2^e`.
    pub fn get_exp(&self) -> i64 {
        self.exp
    }

    pub fn get_category(&self) -> Category {
        self.category
    }

    /// Returns the number with the sign flipped.
    pub fn neg(&self) -> Self {
        let mut x = self.clone();
        x.sign = !x.sign;
        x
    }

    /// Prints the fields of the number to stdout.
    #[cfg(feature = "std")]
    pub fn dump(&self) {
        use std::println;
        let sign = if self.sign { '-' } else { '+' };
        match self.category {
            Category::Normal => println!(
                "Float[{} prec={} exp={} mantissa={}]",
                sign,
                self.prec,
                self.exp,
                self.mantissa.as_decimal()
            ),
            other => println!("Float[{} {:?} prec={}]", sign, other, self.prec),
        }
    }
}

impl Float {
    /// Replaces a number whose exponent is above [`EXP_MAX`] with an
    /// infinity or the largest finite number, as `rm` dictates.
    fn overflow(&mut self, rm: RoundingMode) -> Accuracy {
        let to_inf = rm.overflows_to_inf(self.sign);
        *self = if to_inf {
            Self::inf(self.prec, self.sign)
        } else {
            let max = BigInt::all1s(self.prec);
            Self::raw(self.prec, self.sign, EXP_MAX, max, Category::Normal)
        };
        Accuracy::from_direction(self.sign, to_inf)
    }

    /// Replaces a number whose exponent is below [`EXP_MIN`] with zero, or
    /// with the smallest normal number when `rm` rounds away from zero.
    fn underflow(&mut self, rm: RoundingMode) -> Accuracy {
        let to_min = match rm {
            RoundingMode::Positive => !self.sign,
            RoundingMode::Negative => self.sign,
            _ => false,
        };
        *self = if to_min {
            let min = BigInt::one_hot(self.prec - 1);
            Self::raw(self.prec, self.sign, EXP_MIN, min, Category::Normal)
        } else {
            Self::zero(self.prec, self.sign)
        };
        Accuracy::from_direction(self.sign, to_min)
    }

    /// Drops the low `amt` bits of the significand, keeping the value of the
    /// remaining bits.
    fn drop_low_bits(&mut self, amt: usize) -> Loss {
        let loss = self.mantissa.loss_below(amt);
        self.mantissa.shift_right(amt);
        self.exp += amt as i64;
        loss
    }

    /// Moves the leading one of the significand to bit `prec`, rounds away
    /// the bits below it with `rm`, and clamps the exponent to the legal
    /// range. `loss` describes bits that the caller already dropped below
    /// the significand. Returns the direction of the rounding.
    pub(crate) fn normalize(&mut self, rm: RoundingMode, loss: Loss) -> Accuracy {
        if !self.is_normal() {
            return Accuracy::Exact;
        }

        let msb = self.mantissa.msb_index();
        if msb == 0 {
            debug_assert!(loss.is_zero(), "lost the whole value");
            *self = Self::zero(self.prec, self.sign);
            return Accuracy::Exact;
        }
        let mut loss = loss;
        if msb > self.prec {
            loss = self.drop_low_bits(msb - self.prec).then(loss);
        } else if msb < self.prec {
            debug_assert!(loss.is_zero(), "widening an inexact significand");
            self.mantissa.shift_left(self.prec - msb);
            self.exp -= (self.prec - msb) as i64;
        }

        let mut accuracy = Accuracy::Exact;
        if !loss.is_zero() {
            let away = round_away(rm, self.sign, loss, self.mantissa.is_odd());
            if away {
                self.mantissa.inplace_add(&BigInt::one());
                // 0b111 + 1 = 0b1000 carries out of the significand.
                if self.mantissa.msb_index() > self.prec {
                    let carry = self.drop_low_bits(1);
                    debug_assert!(carry.is_zero());
                }
            }
            accuracy = Accuracy::from_direction(self.sign, away);
        }

        if self.exp > EXP_MAX {
            return self.overflow(rm);
        }
        if self.exp < EXP_MIN {
            return self.underflow(rm);
        }
        accuracy
    }
}

/// Returns true if a truncated significand must be incremented (moved away
/// from zero), given the sign, the lost bits and the parity of the lsb.
pub(crate) fn round_away(rm: RoundingMode, negative: bool, loss: Loss, is_odd: bool) -> bool {
    if loss.is_zero() {
        return false;
    }
    match rm {
        RoundingMode::Positive => !negative,
        RoundingMode::Negative => negative,
        RoundingMode::Zero => false,
        RoundingMode::NearestTiesToAway => loss.is_half_or_more(),
        RoundingMode::NearestTiesToEven => loss.is_above_half() || (loss.is_half() && is_odd),
    }
}

impl Float {
    /// Orders the magnitudes of two normal numbers, of any precision.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        debug_assert!(self.is_normal() && other.is_normal());
        self.exp.cmp(&other.exp).then_with(|| {
            // Line up the significands on the wider precision.
            let (mut a, mut b) = (self.get_mantissa(), other.get_mantissa());
            match self.prec.cmp(&other.prec) {
                Ordering::Less => a.shift_left(other.prec - self.prec),
                Ordering::Greater => b.shift_left(self.prec - other.prec),
                Ordering::Equal => {}
            }
            a.cmp(&b)
        })
    }

    /// Places the non-NaN number on the extended real line: -inf, negative,
    /// zero, positive, +inf.
    fn rank(&self) -> i8 {
        let side = if self.sign { -1 } else { 1 };
        match self.category {
            Category::Zero => 0,
            Category::Normal => side,
            Category::Infinity => 2 * side,
            Category::NaN => unreachable!("NaN has no rank"),
        }
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

/// Compares by value, as in IEEE 754: NaN is unordered, and the two zeros
/// are equal. Numbers of different precision compare by value too.
impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        let ord = self.rank().cmp(&other.rank());
        if ord != Ordering::Equal || !self.is_normal() {
            return Some(ord);
        }
        let ord = self.cmp_magnitude(other);
        Some(if self.sign { ord.reverse() } else { ord })
    }
}

#[test]
fn test_one_imm() {
    let x = Float::one(12, false);
    assert_eq!(x.as_f64(), 1.0);
    assert_eq!(x.get_precision(), 12);
    assert!(x.is_normal());
}

#[test]
fn test_normalize_rounding() {
    // 11 at 3 bits is 0b101|1, a tie that rounds to even (0b110 = 12).
    let x = Float::from_parts(3, false, 2, BigInt::from_u64(0b1011));
    assert_eq!(x.as_f64(), 12.0);
    // 9 at 3 bits is 0b100|1, a tie that stays at the even 0b100 = 8.
    let x = Float::from_parts(3, false, 2, BigInt::from_u64(0b1001));
    assert_eq!(x.as_f64(), 8.0);
    // Carry out of the significand: -15 at 3 bits rounds to -16.
    let mut x = Float::raw(3, true, 2, BigInt::from_u64(0b1111), Category::Normal);
    let acc = x.normalize(RoundingMode::NearestTiesToEven, Loss::Zero);
    assert_eq!(x.as_f64(), -16.0);
    assert_eq!(acc, Accuracy::RoundedDown);
    // A sticky loss below the significand breaks the tie.
    let mut x = Float::raw(3, false, 2, BigInt::from_u64(0b1001), Category::Normal);
    let acc = x.normalize(RoundingMode::NearestTiesToEven, Loss::BelowHalf);
    assert_eq!(x.as_f64(), 10.0);
    assert_eq!(acc, Accuracy::RoundedUp);
}

#[test]
fn test_normalize_directed() {
    let val = BigInt::from_u64(0b10001);
    let mut up = Float::raw(3, false, 2, val.clone(), Category::Normal);
    assert_eq!(up.normalize(RoundingMode::Positive, Loss::Zero), Accuracy::RoundedUp);
    assert_eq!(up.as_f64(), 20.0);
    let mut down = Float::raw(3, false, 2, val.clone(), Category::Normal);
    assert_eq!(down.normalize(RoundingMode::Zero, Loss::Zero), Accuracy::RoundedDown);
    assert_eq!(down.as_f64(), 16.0);
    let mut away = Float::raw(3, true, 2, val, Category::Normal);
    let acc = away.normalize(RoundingMode::NearestTiesToAway, Loss::Zero);
    assert_eq!(away.as_f64(), -16.0);
    assert_eq!(acc, Accuracy::RoundedUp);
}

#[test]
fn test_exponent_range() {
    let big = Float::from_parts(8, false, EXP_MAX + 1, BigInt::from_u64(0x80));
    assert!(big.is_inf());
    let small = Float::from_parts(8, true, EXP_MIN - 1, BigInt::from_u64(0x80));
    assert!(small.is_zero());
    assert!(small.is_negative());

    let mut x = Float::raw(8, false, EXP_MAX + 1, BigInt::from_u64(0x80), Category::Normal);
    assert_eq!(x.normalize(RoundingMode::Zero, Loss::Zero), Accuracy::RoundedDown);
    assert_eq!(x.get_exp(), EXP_MAX);
    assert_eq!(x.get_mantissa(), BigInt::all1s(8));

    let mut x = Float::raw(8, false, EXP_MIN - 1, BigInt::from_u64(0x80), Category::Normal);
    assert_eq!(x.normalize(RoundingMode::Positive, Loss::Zero), Accuracy::RoundedUp);
    assert_eq!(x.get_exp(), EXP_MIN);
}

#[test]
fn test_comparisons() {
    use crate::utils;

    // The order of the edge values matches the order of the doubles.
    for first in utils::edge_values() {
        for second in utils::edge_values() {
            let expected = first.partial_cmp(&second);
            let first = Float::from_f64(first);
            let second = Float::from_f64(second);
            assert_eq!(first.partial_cmp(&second), expected);
            assert_eq!(first == second, expected == Some(Ordering::Equal));
        }
    }

    // Values of different precision compare by value.
    let a = Float::from_f64(1.5);
    let b = Float::from_f64(1.5).cast(300);
    assert_eq!(a, b);
    assert!(Float::from_f64(1.25).cast(7) < b);
    assert!(Float::from_f64(-1.25).cast(7) > b.neg());
}
