//! Conversion between floats and decimal strings.

extern crate alloc;

use super::bigint::BigInt;
use super::error::ParseError;
use super::float::{Category, Float};
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// The largest decimal exponent (after moving the point to the end of the
/// digits) that the parser accepts.
pub const MAX_DECIMAL_EXP: i64 = 40_000;

/// Converts a number of bits to a number of decimal digits, rounding down.
/// 59/196 is a convergent of the continued fraction of log10(2).
fn bits_to_digits(bits: usize) -> usize {
    bits * 59 / 196
}

impl Float {
    /// Returns the number of decimal digits that tell apart all of the
    /// numbers with this precision (Matula: 2 + floor((p - 1) * log10(2))).
    pub fn get_decimal_accuracy(&self) -> usize {
        2 + bits_to_digits(self.get_precision() - 1)
    }

    /// Returns the value of a normal number as `digits * 10^-frac`. The
    /// expansion is exact, except that fraction digits beyond the accuracy of
    /// the significand are truncated.
    fn to_decimal(&self) -> (BigInt, usize) {
        let stored_bits = self.get_precision() - 1;
        // The value is mantissa * 2^-frac_bits.
        let frac_bits = stored_bits as i64 - self.get_exp();
        let mut digits = self.get_mantissa();
        if frac_bits <= 0 {
            digits.shift_left(frac_bits.unsigned_abs() as usize);
            return (digits, 0);
        }

        // m * 2^-k = m * 5^k * 10^-k.
        let frac_bits = frac_bits as usize;
        digits.inplace_mul(&BigInt::from_u64(5).powi(frac_bits as u64));
        let excess = digits.msb_index().saturating_sub(stored_bits);
        let drop = bits_to_digits(excess).min(frac_bits);
        if drop > 0 {
            digits.inplace_div(&BigInt::from_u64(10).powi(drop as u64));
        }
        (digits, frac_bits - drop)
    }
}

/// Prints the exact binary value in positional decimal, such as `-12.5`,
/// `.001` or `256.`, without the trailing zeros of the fraction. Digits
/// beyond the accuracy of the precision are cut. Numbers with fewer than 17
/// bits print through a 24-bit copy.
impl Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.get_precision() < 17 {
            return write!(f, "{}", self.cast(24));
        }
        if self.get_sign() {
            f.write_str("-")?;
        }
        match self.get_category() {
            Category::Infinity => f.write_str("Inf"),
            Category::NaN => f.write_str("NaN"),
            Category::Zero => f.write_str("0.0"),
            Category::Normal => {
                let (digits, frac) = self.to_decimal();
                let digits = digits.to_digits();
                let mut text: Vec<u8> = Vec::with_capacity(digits.len().max(frac));
                // Leading zeros of a number below one.
                text.resize(frac.saturating_sub(digits.len()), b'0');
                text.extend(digits.iter().map(|d| b'0' + d));
                let (int, fraction) = text.split_at(text.len() - frac);
                // Every byte is an ASCII digit.
                let int = core::str::from_utf8(int).map_err(|_| fmt::Error)?;
                let fraction = core::str::from_utf8(fraction).map_err(|_| fmt::Error)?;
                write!(f, "{}.{}", int, fraction.trim_end_matches('0'))
            }
        }
    }
}

impl Float {
    /// Parse the decimal string `value` into a float with `prec` bits. The
    /// result is correctly rounded to the nearest even. The accepted syntax
    /// is an optional sign, digits with an optional decimal point, and an
    /// optional exponent marker (`e` or `E`) followed by a signed integer.
    /// The strings `inf` and `nan` (in any case) are also accepted.
    ///
    /// ```
    ///    use sqrtfloat::Float;
    ///
    ///    let x = Float::parse(53, "-54.85e-1").unwrap();
    ///    assert_eq!(x.as_f64(), -5.485);
    ///    assert!(Float::parse(53, "1.2.3").is_err());
    /// ```
    pub fn parse(prec: usize, value: &str) -> Result<Self, ParseError> {
        // Handle the empty case.
        if value.is_empty() {
            return Err(ParseError::InputEmpty);
        }

        // Handle the plus or minus in front of the number.
        let chars = value.as_bytes();
        let (sign, skip) = if chars[0] == b'-' || chars[0] == b'+' {
            (chars[0] == b'-', 1)
        } else {
            (false, 0)
        };
        let value = &value[skip..];

        // Handle Nan.
        if value.eq_ignore_ascii_case("nan") {
            return Ok(Self::nan(prec, sign));
        }

        // Handle Inf.
        if value.eq_ignore_ascii_case("inf") || value.eq_ignore_ascii_case("infinity") {
            return Ok(Self::inf(prec, sign));
        }

        let (digits, exp) = parse_with_exp(value)?;
        let (num, frac_digits) = parse_digits(digits)?;

        // Move the decimal point to the end of the digits.
        let exp = exp
            .checked_sub(frac_digits as i64)
            .ok_or(ParseError::ExponentOverflow(exp))?;
        if exp.unsigned_abs() > MAX_DECIMAL_EXP as u64 {
            return Err(ParseError::ExponentOverflow(exp));
        }

        if num.is_zero() {
            return Ok(Self::zero(prec, sign));
        }
        Ok(Self::from_decimal(prec, sign, num, exp))
    }

    /// Returns the number `num * 10^exp`, rounded to `prec` bits.
    fn from_decimal(prec: usize, sign: bool, num: BigInt, exp: i64) -> Self {
        // An integer has the exponent prec - 1 (see from_parts).
        let int_exp = prec as i64 - 1;
        if exp >= 0 {
            let scaled = num * &BigInt::from_u64(10).powi(exp as u64);
            return Self::from_parts(prec, sign, int_exp, scaled);
        }

        // num * 10^exp == num / 5^-exp * 2^exp. Divide with enough bits to
        // leave two bits below the rounding point, and append a sticky bit.
        let five = BigInt::from_u64(5).powi((-exp) as u64);
        let shift = (prec + 3 + five.msb_index()).saturating_sub(num.msb_index());
        let mut quotient = num;
        quotient.shift_left(shift);
        let rem = quotient.inplace_div(&five);
        let mut shift = shift as i64;
        if !rem.is_zero() {
            quotient.shift_left(1);
            quotient.inplace_add(&BigInt::one());
            shift += 1;
        }
        Self::from_parts(prec, sign, int_exp + exp - shift, quotient)
    }
}

impl TryFrom<&str> for Float {
    type Error = ParseError;

    /// Parse a decimal string into a float with the precision of a double.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(53, value)
    }
}

/// Split the number at the 'e' marker for exponent. Example: 565e+1
/// Returns the digits, and the value of the exponent (zero if missing).
fn parse_with_exp(value: &str) -> Result<(&str, i64), ParseError> {
    let idx = value.find(|c| c == 'e' || c == 'E');
    let Some(idx) = idx else {
        return Ok((value, 0));
    };
    let (num, exp) = value.split_at(idx);
    let exp = &exp[1..];

    // Parse the right side (the exponent expression).
    let unsigned = exp.strip_prefix(['+', '-']).unwrap_or(exp);
    if unsigned.is_empty() || !unsigned.bytes().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidExponent);
    }
    match exp.parse::<i64>() {
        Ok(exp) => Ok((num, exp)),
        // All digits, so the only failure is a value out of the i64 range.
        Err(_) => {
            let saturated = if exp.starts_with('-') { i64::MIN } else { i64::MAX };
            Err(ParseError::ExponentOverflow(saturated))
        }
    }
}

/// Parse the digits, with an optional decimal point, into an integer.
/// Returns the integer and the number of digits after the point.
fn parse_digits(value: &str) -> Result<(BigInt, usize), ParseError> {
    let (int_part, frac_part) = match value.split_once('.') {
        Some((l, r)) => (l, r),
        None => (value, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseError::InvalidNumber);
    }

    // Accumulate up to 19 digits in a word, and then fold them in.
    const CHUNK: usize = 19;
    let mut num = BigInt::zero();
    let mut word: u64 = 0;
    let mut word_digits = 0;
    for c in int_part.bytes().chain(frac_part.bytes()) {
        if !c.is_ascii_digit() {
            return Err(ParseError::InvalidNumber);
        }
        word = word * 10 + (c - b'0') as u64;
        word_digits += 1;
        if word_digits == CHUNK {
            num.inplace_mul(&BigInt::from_u64(10u64.pow(CHUNK as u32)));
            num.inplace_add(&BigInt::from_u64(word));
            word = 0;
            word_digits = 0;
        }
    }
    num.inplace_mul(&BigInt::from_u64(10u64.pow(word_digits as u32)));
    num.inplace_add(&BigInt::from_u64(word));
    Ok((num, frac_part.len()))
}

#[cfg(feature = "std")]
#[test]
fn test_convert_to_string() {
    use core::f64;
    use std::format;

    fn to_str_w_fp16(val: f64) -> String {
        format!("{}", Float::from_f64(val).cast(11))
    }

    fn to_str_w_bf16(val: f64) -> String {
        format!("{}", Float::from_f64(val).cast(8))
    }

    fn to_str_w_fp64(val: f64) -> String {
        format!("{}", Float::from_f64(val))
    }

    assert_eq!("-0.0", to_str_w_fp16(-0.));
    assert_eq!(".30004882", to_str_w_fp16(0.3));
    assert_eq!("4.5", to_str_w_fp16(4.5));
    assert_eq!("256.", to_str_w_fp16(256.));
    assert_eq!("Inf", to_str_w_fp16(f64::INFINITY));
    assert_eq!("-Inf", to_str_w_fp16(f64::NEG_INFINITY));
    assert_eq!("NaN", to_str_w_fp64(f64::NAN));
    assert_eq!(".09997558", to_str_w_fp16(0.1));
    assert_eq!(".1", to_str_w_fp64(0.1));
    assert_eq!(".29999999999999998", to_str_w_fp64(0.3));
    assert_eq!("2251799813685248.", to_str_w_fp64((1u64 << 51) as f64));
    assert_eq!("1995.1994999999999", to_str_w_fp64(1995.1995));
    assert_eq!("3.140625", to_str_w_bf16(f64::consts::PI));
}

#[test]
fn test_from_string() {
    use alloc::string::ToString;

    assert_eq!("-3.", Float::try_from("-3.0").unwrap().to_string());
    assert_eq!("-3.", Float::try_from("-3.00").unwrap().to_string());
    assert_eq!("30.", Float::try_from("30").unwrap().to_string());
    assert_eq!("430.56", Float::try_from("430.56").unwrap().to_string());
    assert_eq!("5.2", Float::try_from("5.2").unwrap().to_string());
    assert_eq!("Inf", Float::try_from("inf").unwrap().to_string());
    assert_eq!("-Inf", Float::try_from("-Infinity").unwrap().to_string());
    assert_eq!("NaN", Float::try_from("nan").unwrap().to_string());
    assert_eq!("32.", Float::try_from("3.2e1").unwrap().to_string());
    assert_eq!("4.4", Float::try_from("44.e-1").unwrap().to_string());
    assert_eq!("5.4", Float::try_from("54e-1").unwrap().to_string());
    assert_eq!("-5.485", Float::try_from("-54.85e-1").unwrap().to_string());
    assert_eq!(".5", Float::try_from(".5").unwrap().to_string());
    assert_eq!("-0.0", Float::try_from("-0.000e7").unwrap().to_string());
    assert!(Float::try_from("abc.de").is_err());
    assert!(Float::try_from("e.-21").is_err());
    assert!(Float::try_from("-rlp.").is_err());
    assert!(Float::try_from(".").is_err());
    assert!(Float::try_from("1e").is_err());
    assert!(Float::try_from("1e+-2").is_err());
    assert_eq!(Float::try_from(""), Err(ParseError::InputEmpty));
}

#[test]
fn test_parse_errors() {
    assert_eq!(Float::parse(53, "12x"), Err(ParseError::InvalidNumber));
    assert_eq!(Float::parse(53, "1.5e1.5"), Err(ParseError::InvalidExponent));
    assert_eq!(
        Float::parse(53, "1e99999999999999999999"),
        Err(ParseError::ExponentOverflow(i64::MAX))
    );
    assert_eq!(
        Float::parse(53, "1.25e-40000"),
        Err(ParseError::ExponentOverflow(-40002))
    );
    assert!(Float::parse(53, "1e-39998").is_ok());
}

#[test]
fn test_parse_rounding() {
    // Halfway between 1 and the next double, which rounds to even.
    let x = Float::parse(53, "1.00000000000000011102230246251565404236316680908203125").unwrap();
    assert_eq!(x.as_f64(), 1.0);
    // Just above the halfway point.
    let x = Float::parse(53, "1.00000000000000011102230246251565404236316680908203126").unwrap();
    assert_eq!(x.as_f64(), 1.0000000000000002);

    // Wide precision keeps the digits.
    let x = Float::parse(200, "0.1").unwrap();
    assert_eq!(x.get_precision(), 200);
    assert_ne!(x, Float::from_f64(0.1));
    assert_eq!(x.as_f64(), 0.1);

    // Huge and tiny decimal exponents.
    assert_eq!(Float::parse(53, "1e300").unwrap().as_f64(), 1e300);
    assert_eq!(Float::parse(53, "-2.5e-300").unwrap().as_f64(), -2.5e-300);
    let big = Float::parse(53, "1e1000").unwrap();
    assert!(big.is_normal());
    assert!(big.as_f64().is_infinite());
}

#[cfg(feature = "std")]
#[test]
fn test_parse_matches_native() {
    use crate::utils::Lfsr;
    use std::format;

    // Random decimal strings, compared to the correctly rounded native
    // parsers.
    let mut lfsr = Lfsr::new();
    for _ in 0..3000 {
        let digits = lfsr.next_u64() % 10_000_000_000_000_000_000;
        let frac = lfsr.next_u64() % 100_000_000;
        let exp = (lfsr.next_u64() % 500) as i64 - 250;
        let s = format!("{}.{:08}e{}", digits, frac, exp);
        let expected: f64 = s.parse().unwrap();
        assert_eq!(Float::parse(53, &s).unwrap().as_f64().to_bits(), expected.to_bits(), "{}", s);

        let exp = (lfsr.next_u64() % 40) as i64 - 30;
        let s = format!("{}e{}", digits % 100_000_000_000, exp);
        let expected: f32 = s.parse().unwrap();
        assert_eq!(Float::parse(24, &s).unwrap(), Float::from_f32(expected), "{}", s);
    }
}

#[test]
fn test_fuzz_printing() {
    use crate::utils;

    let mut lfsr = utils::Lfsr::new();

    for _ in 0..500 {
        let v0 = lfsr.next_u64();
        let f0 = f64::from_bits(v0);
        let fp0 = Float::from_f64(f0);
        fp0.to_string();
    }
}

#[test]
fn test_decimal_accuracy_for_type() {
    assert_eq!(Float::zero(11, false).get_decimal_accuracy(), 5);
    assert_eq!(Float::zero(24, false).get_decimal_accuracy(), 8);
    assert_eq!(Float::zero(53, false).get_decimal_accuracy(), 17);
    assert_eq!(Float::zero(113, false).get_decimal_accuracy(), 35);
    assert_eq!(Float::zero(237, false).get_decimal_accuracy(), 73);
}
