//! Unsigned integers of arbitrary size. A [`BigInt`] holds the significand of
//! a float, and carries the exact integer steps of rounding, parsing and
//! printing.

extern crate alloc;

use core::cmp::Ordering;
use core::ops::{Add, Mul, MulAssign, Sub};

use alloc::string::String;
use alloc::vec::Vec;

/// The part of a value that is dropped when low bits are truncated, relative
/// to half of the new lsb. The rounding decisions only look at this and at
/// the parity of the lsb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Loss {
    /// 0000
    Zero,
    /// 0xxx
    BelowHalf,
    /// 1000
    Half,
    /// 1xxx
    AboveHalf,
}

impl Loss {
    pub fn is_zero(&self) -> bool {
        *self == Loss::Zero
    }
    pub fn is_half(&self) -> bool {
        *self == Loss::Half
    }
    pub fn is_above_half(&self) -> bool {
        *self == Loss::AboveHalf
    }
    pub fn is_half_or_more(&self) -> bool {
        matches!(self, Loss::Half | Loss::AboveHalf)
    }

    /// Merge a loss with a less significant `tail` loss that was dropped
    /// earlier.
    pub fn then(self, tail: Loss) -> Loss {
        match (self, tail.is_zero()) {
            (Loss::Zero, false) => Loss::BelowHalf,
            (Loss::Half, false) => Loss::AboveHalf,
            (loss, _) => loss,
        }
    }
}

/// An unsigned integer of arbitrary size, stored as little-endian 64-bit
/// words.
///
/// ```
///    use sqrtfloat::BigInt;
///
///    // 1995 * 90210 = 179968950
///    let x = BigInt::from_u64(1995) * &BigInt::from_u64(90210);
///    assert_eq!(x.powi(2).as_decimal(), "32388822964102500");
/// ```
#[derive(Debug, Clone)]
pub struct BigInt {
    words: Vec<u64>,
}

impl BigInt {
    pub fn zero() -> Self {
        Self::from_u64(0)
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Returns 2^`bit`.
    pub fn one_hot(bit: usize) -> Self {
        let mut x = Self::zero();
        x.set_bit(bit);
        x
    }

    /// Returns 2^`bits` - 1.
    pub fn all1s(bits: usize) -> Self {
        let mut words = alloc::vec![u64::MAX; bits / 64];
        if bits % 64 != 0 || words.is_empty() {
            words.push((1u64 << (bits % 64)) - 1);
        }
        let mut x = BigInt { words };
        x.trim();
        x
    }

    pub fn from_u64(val: u64) -> Self {
        BigInt {
            words: Vec::from([val]),
        }
    }

    pub fn from_u128(val: u128) -> Self {
        let mut x = BigInt {
            words: Vec::from([val as u64, (val >> 64) as u64]),
        };
        x.trim();
        x
    }

    /// Returns the value, which must fit in a word.
    pub fn as_u64(&self) -> u64 {
        debug_assert!(self.words[1..].iter().all(|&w| w == 0));
        self.words[0]
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_odd(&self) -> bool {
        self.words[0] & 1 == 1
    }

    fn set_bit(&mut self, bit: usize) {
        let word = bit / 64;
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (bit % 64);
    }

    /// Clears every bit at or above `bits`.
    pub fn mask(&mut self, bits: usize) {
        let full = bits / 64;
        if full >= self.words.len() {
            return;
        }
        self.words[full] &= (1u64 << (bits % 64)) - 1;
        self.words.truncate(full + 1);
        self.trim();
    }

    /// Classifies the low `bits` bits, which a right shift by `bits` drops.
    pub(crate) fn loss_below(&self, bits: usize) -> Loss {
        if bits == 0 {
            return Loss::Zero;
        }
        let mut low = self.clone();
        low.mask(bits);
        if low.is_zero() {
            return Loss::Zero;
        }
        match low.cmp(&Self::one_hot(bits - 1)) {
            Ordering::Less => Loss::BelowHalf,
            Ordering::Equal => Loss::Half,
            Ordering::Greater => Loss::AboveHalf,
        }
    }

    /// Returns the 1-based position of the highest set bit, or 0 for zero.
    pub fn msb_index(&self) -> usize {
        self.words
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |i| i * 64 + (64 - self.words[i].leading_zeros() as usize))
    }

    /// Drops the high zero words. One word always remains.
    fn trim(&mut self) {
        let used = self.words.iter().rposition(|&w| w != 0).map_or(1, |i| i + 1);
        self.words.truncate(used);
    }

    pub fn inplace_add(&mut self, rhs: &Self) {
        if self.words.len() < rhs.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        let mut carry = 0u64;
        for (i, word) in self.words.iter_mut().enumerate() {
            let r = rhs.words.get(i).copied().unwrap_or(0);
            if i >= rhs.words.len() && carry == 0 {
                break;
            }
            let (sum, c0) = word.overflowing_add(r);
            let (sum, c1) = sum.overflowing_add(carry);
            *word = sum;
            carry = (c0 | c1) as u64;
        }
        if carry != 0 {
            self.words.push(carry);
        }
    }

    /// Subtracts `rhs`. Returns true if `rhs` was larger, in which case the
    /// result wrapped around.
    #[must_use]
    pub fn inplace_sub(&mut self, rhs: &Self) -> bool {
        if self.words.len() < rhs.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        let mut borrow = 0u64;
        for (i, word) in self.words.iter_mut().enumerate() {
            let r = rhs.words.get(i).copied().unwrap_or(0);
            if i >= rhs.words.len() && borrow == 0 {
                break;
            }
            let (diff, b0) = word.overflowing_sub(r);
            let (diff, b1) = diff.overflowing_sub(borrow);
            *word = diff;
            borrow = (b0 | b1) as u64;
        }
        self.trim();
        borrow != 0
    }

    /// Schoolbook multiplication.
    pub fn inplace_mul(&mut self, rhs: &Self) {
        let mut out = alloc::vec![0u64; self.words.len() + rhs.words.len()];
        for (i, &a) in self.words.iter().enumerate().filter(|&(_, &a)| a != 0) {
            let mut carry = 0u128;
            for (j, &b) in rhs.words.iter().enumerate() {
                let acc = out[i + j] as u128 + a as u128 * b as u128 + carry;
                out[i + j] = acc as u64;
                carry = acc >> 64;
            }
            out[i + rhs.words.len()] = carry as u64;
        }
        self.words = out;
        self.trim();
    }

    /// Divides by a single word. Returns the remainder.
    pub fn inplace_div_word(&mut self, divisor: u64) -> u64 {
        assert_ne!(divisor, 0, "division by zero");
        let mut rem = 0u128;
        for word in self.words.iter_mut().rev() {
            let cur = (rem << 64) | *word as u128;
            *word = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }
        self.trim();
        rem as u64
    }

    /// Divides by `divisor`, leaving the quotient in place. Returns the
    /// remainder.
    pub fn inplace_div(&mut self, divisor: &Self) -> Self {
        let divisor_bits = divisor.msb_index();
        assert_ne!(divisor_bits, 0, "division by zero");
        if divisor_bits <= 64 {
            return Self::from_u64(self.inplace_div_word(divisor.words[0]));
        }

        let bits = self.msb_index();
        if bits < divisor_bits {
            return core::mem::take(self);
        }

        // Restoring division. The remainder starts with the top bits of the
        // dividend, and takes one more bit at a time.
        let steps = bits - divisor_bits + 1;
        let mut rem = self.clone();
        rem.shift_right(steps);
        let mut quotient = Self::zero();
        for i in (0..steps).rev() {
            rem.double();
            if (self.words[i / 64] >> (i % 64)) & 1 == 1 {
                rem.words[0] |= 1;
            }
            if rem >= *divisor {
                let borrow = rem.inplace_sub(divisor);
                debug_assert!(!borrow);
                quotient.set_bit(i);
            }
        }
        *self = quotient;
        rem
    }

    /// Shift left by one bit, in place.
    fn double(&mut self) {
        let mut carry = 0;
        for word in self.words.iter_mut() {
            let top = *word >> 63;
            *word = (*word << 1) | carry;
            carry = top;
        }
        if carry != 0 {
            self.words.push(carry);
        }
    }

    pub fn shift_left(&mut self, bits: usize) {
        if self.is_zero() || bits == 0 {
            return;
        }
        let (words, offset) = (bits / 64, bits % 64);
        let mut out = alloc::vec![0u64; words];
        out.reserve(self.words.len() + 1);
        let mut spill = 0u64;
        for &w in self.words.iter() {
            if offset == 0 {
                out.push(w);
            } else {
                out.push((w << offset) | spill);
                spill = w >> (64 - offset);
            }
        }
        out.push(spill);
        self.words = out;
        self.trim();
    }

    pub fn shift_right(&mut self, bits: usize) {
        let (words, offset) = (bits / 64, bits % 64);
        if words >= self.words.len() {
            *self = Self::zero();
            return;
        }
        self.words.drain(..words);
        if offset != 0 {
            let len = self.words.len();
            for i in 0..len {
                let hi = if i + 1 < len { self.words[i + 1] } else { 0 };
                self.words[i] = (self.words[i] >> offset) | (hi << (64 - offset));
            }
        }
        self.trim();
    }

    /// Returns self^`exp`, by repeated squaring.
    pub fn powi(&self, exp: u64) -> Self {
        let mut acc = Self::one();
        let mut square = self.clone();
        let mut exp = exp;
        while exp != 0 {
            if exp & 1 == 1 {
                acc.inplace_mul(&square);
            }
            exp >>= 1;
            if exp != 0 {
                let s = square.clone();
                square.inplace_mul(&s);
            }
        }
        acc
    }

    /// Returns the base-10 digits, most significant first.
    pub(crate) fn to_digits(&self) -> Vec<u8> {
        // 10^19 is the largest power of ten in a word.
        const CHUNK: u64 = 10_000_000_000_000_000_000;
        let mut val = self.clone();
        let mut digits = Vec::new();
        loop {
            let mut chunk = val.inplace_div_word(CHUNK);
            let done = val.is_zero();
            for _ in 0..19 {
                digits.push((chunk % 10) as u8);
                chunk /= 10;
                if done && chunk == 0 {
                    break;
                }
            }
            if done {
                break;
            }
        }
        while digits.len() > 1 && digits.last() == Some(&0) {
            digits.pop();
        }
        digits.reverse();
        digits
    }

    pub fn as_decimal(&self) -> String {
        self.to_digits()
            .iter()
            .map(|d| char::from(b'0' + d))
            .collect()
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &BigInt) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        // Both are trimmed, except for transient zero words.
        let len = self.words.len().max(other.words.len());
        (0..len)
            .rev()
            .map(|i| {
                let a = self.words.get(i).copied().unwrap_or(0);
                let b = other.words.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Add<&BigInt> for BigInt {
    type Output = BigInt;
    fn add(mut self, rhs: &BigInt) -> BigInt {
        self.inplace_add(rhs);
        self
    }
}

impl Add<u64> for BigInt {
    type Output = BigInt;
    fn add(self, rhs: u64) -> BigInt {
        self + &BigInt::from_u64(rhs)
    }
}

impl Sub<&BigInt> for BigInt {
    type Output = BigInt;
    fn sub(mut self, rhs: &BigInt) -> BigInt {
        let borrow = self.inplace_sub(rhs);
        debug_assert!(!borrow, "unsigned subtraction underflow");
        self
    }
}

impl Mul<&BigInt> for BigInt {
    type Output = BigInt;
    fn mul(mut self, rhs: &BigInt) -> BigInt {
        self.inplace_mul(rhs);
        self
    }
}

impl MulAssign<&BigInt> for BigInt {
    fn mul_assign(&mut self, rhs: &BigInt) {
        self.inplace_mul(rhs);
    }
}

#[test]
fn test_shifts() {
    let mut x = BigInt::from_u64(0xff);
    x.shift_left(124);
    assert_eq!(x.msb_index(), 132);
    assert_eq!(x.loss_below(124), Loss::Zero);
    x.shift_right(120);
    assert_eq!(x.as_u64(), 0xff0);
    x.shift_left(64);
    x.shift_right(64);
    assert_eq!(x.as_u64(), 0xff0);
    x.shift_right(64);
    assert!(x.is_zero());
    assert_eq!(x.msb_index(), 0);
}

#[test]
fn test_loss() {
    let x = BigInt::from_u64(0b1011_0000);
    assert_eq!(x.loss_below(4), Loss::Zero);
    assert_eq!(x.loss_below(5), Loss::Half);
    assert_eq!(x.loss_below(6), Loss::AboveHalf);
    assert_eq!(x.loss_below(7), Loss::BelowHalf);
    assert_eq!(x.loss_below(8), Loss::AboveHalf);
    assert_eq!(x.loss_below(0), Loss::Zero);

    assert_eq!(Loss::Zero.then(Loss::Half), Loss::BelowHalf);
    assert_eq!(Loss::Half.then(Loss::BelowHalf), Loss::AboveHalf);
    assert_eq!(Loss::Half.then(Loss::Zero), Loss::Half);
    assert_eq!(Loss::BelowHalf.then(Loss::AboveHalf), Loss::BelowHalf);
    assert!(Loss::Half.is_half_or_more() && !Loss::BelowHalf.is_half_or_more());
}

#[test]
fn test_all1s_and_mask() {
    assert!(BigInt::all1s(0).is_zero());
    assert_eq!(BigInt::all1s(5).as_u64(), 0b11111);
    assert_eq!(BigInt::all1s(64).as_u64(), u64::MAX);
    assert_eq!(BigInt::all1s(70).msb_index(), 70);

    let mut x = BigInt::all1s(130);
    x.mask(65);
    assert_eq!(x, BigInt::all1s(65));
    x.mask(200);
    assert_eq!(x, BigInt::all1s(65));
}

#[test]
fn test_against_u128() {
    use crate::utils::Lfsr;

    let mut lfsr = Lfsr::new();
    for _ in 0..2000 {
        let a = ((lfsr.next_u64() as u128) << 64) | lfsr.next_u64() as u128;
        let b = (lfsr.next_u64() >> (lfsr.next_u64() % 64)) as u128 + 1;

        if let Some(sum) = a.checked_add(b) {
            let s = BigInt::from_u128(a) + &BigInt::from_u128(b);
            assert_eq!(s, BigInt::from_u128(sum));
        }

        let mut d = BigInt::from_u128(a);
        let borrow = d.inplace_sub(&BigInt::from_u128(b));
        assert_eq!(borrow, a < b);
        if !borrow {
            assert_eq!(d, BigInt::from_u128(a - b));
        }

        let p = BigInt::from_u128(a >> 64) * &BigInt::from_u128(b);
        assert_eq!(p, BigInt::from_u128((a >> 64) * b));

        let mut q = BigInt::from_u128(a);
        let r = q.inplace_div(&BigInt::from_u128(b << 40));
        assert_eq!(q, BigInt::from_u128(a / (b << 40)));
        assert_eq!(r, BigInt::from_u128(a % (b << 40)));
    }
}

#[test]
fn test_div_wide() {
    // (2^200 + 12345) / (2^100 + 1)
    let mut n = BigInt::one_hot(200) + 12345;
    let d = BigInt::one_hot(100) + 1;
    let r = n.inplace_div(&d);
    let mut back = n * &d;
    back.inplace_add(&r);
    assert_eq!(back, BigInt::one_hot(200) + 12345);
    assert!(r < d);

    // A divisor larger than the dividend.
    let mut small = BigInt::one_hot(70);
    let r = small.inplace_div(&BigInt::one_hot(90));
    assert!(small.is_zero());
    assert_eq!(r, BigInt::one_hot(70));
}

#[test]
fn test_powi_and_digits() {
    assert_eq!(BigInt::from_u64(5).powi(3).as_u64(), 125);
    assert_eq!(BigInt::from_u64(10).powi(0).as_u64(), 1);
    assert_eq!(BigInt::zero().as_decimal(), "0");
    assert_eq!(BigInt::from_u64(1).powi(40).as_decimal(), "1");
    assert_eq!(
        BigInt::from_u64(10).powi(25).as_decimal(),
        "10000000000000000000000000"
    );
    assert_eq!(
        BigInt::from_u128(u128::MAX).as_decimal(),
        "340282366920938463463374607431768211455"
    );
    let mut x = BigInt::from_u64(3);
    x *= &BigInt::from_u64(7).powi(30);
    assert_eq!(x.as_decimal(), "67618020872076774263589747");
}
