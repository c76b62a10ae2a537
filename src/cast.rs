use super::bigint::{BigInt, Loss};
use super::float::{self, Accuracy, Category, Float, RoundingMode};
use super::utils::low_bits;

impl Float {
    /// Load the integer `val` into a float with `prec` bits. The number is
    /// rounded to the nearest even if `val` does not fit in `prec` bits.
    pub fn from_u64(prec: usize, val: u64) -> Self {
        if val == 0 {
            return Self::zero(prec, false);
        }
        // The raw significand is an integer when exp = prec - 1.
        Self::from_parts(prec, false, prec as i64 - 1, BigInt::from_u64(val))
    }

    /// Load the integer `val` into a float with `prec` bits. The number is
    /// rounded to the nearest even if `val` does not fit in `prec` bits.
    pub fn from_i64(prec: usize, val: i64) -> Self {
        let mut a = Self::from_u64(prec, val.unsigned_abs());
        a.set_sign(val < 0);
        a
    }

    /// Cast the number to a float with `prec` bits, using the rounding mode
    /// `rm`. Returns the new number and the direction of the rounding.
    pub fn cast_with_rm(&self, prec: usize, rm: RoundingMode) -> (Self, Accuracy) {
        if !self.is_normal() {
            let x = Self::raw(
                prec,
                self.get_sign(),
                0,
                BigInt::zero(),
                self.get_category(),
            );
            return (x, Accuracy::Exact);
        }
        // Keep the value of the lsb, and let normalize move the msb.
        let exp = self.get_exp() + prec as i64 - self.get_precision() as i64;
        let mut x = Self::raw(
            prec,
            self.get_sign(),
            exp,
            self.get_mantissa(),
            Category::Normal,
        );
        let acc = x.normalize(rm, Loss::Zero);
        (x, acc)
    }

    /// Cast the number to a float with `prec` bits, rounding to the nearest
    /// even.
    pub fn cast(&self, prec: usize) -> Self {
        self.cast_with_rm(prec, RoundingMode::NearestTiesToEven).0
    }

    /// Returns the number multiplied by 2^`k`. This is exact unless the
    /// result leaves the exponent range.
    pub fn scale(&self, k: i64) -> Self {
        if !self.is_normal() {
            return self.clone();
        }
        let mut x = Self::raw(
            self.get_precision(),
            self.get_sign(),
            self.get_exp().saturating_add(k),
            self.get_mantissa(),
            Category::Normal,
        );
        x.normalize(RoundingMode::NearestTiesToEven, Loss::Zero);
        x
    }

    /// Decode the IEEE-754 interchange format with `exponent_len` exponent
    /// bits and `mantissa_len` stored significand bits. The result has the
    /// precision `mantissa_len + 1` and holds the exact value.
    fn from_ieee_bits(bits: u64, exponent_len: usize, mantissa_len: usize) -> Self {
        let prec = mantissa_len + 1;
        let bias = low_bits(exponent_len - 1) as i64;
        // Extract the biased exponent (wipe the sign and mantissa).
        let biased_exp = ((bits >> mantissa_len) & low_bits(exponent_len)) as i64;
        let sign = (bits >> (exponent_len + mantissa_len)) & 1 == 1;
        // Wipe the sign and exponent.
        let mantissa = bits & low_bits(mantissa_len);

        // Check for NaN/Inf
        if biased_exp == low_bits(exponent_len) as i64 {
            if mantissa == 0 {
                return Self::inf(prec, sign);
            }
            return Self::nan(prec, sign);
        }

        if biased_exp == 0 {
            if mantissa == 0 {
                return Self::zero(prec, sign);
            }
            // Denormals have the exponent of the smallest normal, without
            // the implicit bit. Normalization moves the msb into place.
            let m = BigInt::from_u64(mantissa);
            return Self::from_parts(prec, sign, 1 - bias, m);
        }

        // Add the implicit bit for normal numbers.
        let m = BigInt::from_u64(mantissa | (1u64 << mantissa_len));
        Self::raw(prec, sign, biased_exp - bias, m, Category::Normal)
    }

    /// Encode the number in the IEEE-754 interchange format with
    /// `exponent_len` exponent bits and `mantissa_len` stored significand
    /// bits, rounding with `rm`. Values below the normal range are rounded
    /// once, directly to the denormal grid.
    fn to_ieee_bits(
        &self,
        exponent_len: usize,
        mantissa_len: usize,
        rm: RoundingMode,
    ) -> (u64, Accuracy) {
        // https://en.wikipedia.org/wiki/IEEE_754
        let all_ones = low_bits(exponent_len);
        let sign = self.get_sign();
        let sign_bit = (sign as u64) << (exponent_len + mantissa_len);
        let encode = |exp: u64, mantissa: u64| sign_bit | (exp << mantissa_len) | mantissa;

        match self.get_category() {
            Category::Infinity => return (encode(all_ones, 0), Accuracy::Exact),
            Category::NaN => {
                return (encode(all_ones, 1 << (mantissa_len - 1)), Accuracy::Exact)
            }
            Category::Zero => return (encode(0, 0), Accuracy::Exact),
            Category::Normal => {}
        }

        let bias = low_bits(exponent_len - 1) as i64;
        let emin = 1 - bias;
        let emax = bias;
        let prec = self.get_precision() as i64;
        let exp = self.get_exp();

        // The value of the lsb of the result. Below the normal range the
        // lsb stays at the value of the lsb of the smallest denormal.
        let lsb = exp.max(emin) - mantissa_len as i64;
        let shift = lsb - (exp - prec + 1);

        let mut m = self.get_mantissa();
        let mut loss = Loss::Zero;
        if shift > 0 {
            // Past prec + 1 bits everything is shifted out, with the same loss.
            let shift = shift.min(prec + 1) as usize;
            loss = m.loss_below(shift);
            m.shift_right(shift);
        } else {
            m.shift_left((-shift) as usize);
        }

        let away = float::round_away(rm, sign, loss, m.is_odd());
        if away {
            m.inplace_add(&BigInt::one());
        }
        let mut accuracy = if loss.is_zero() {
            Accuracy::Exact
        } else {
            Accuracy::from_direction(sign, away)
        };

        let mut lsb = lsb;
        // Did the mantissa overflow? 0b111 + 1 = 0b1000.
        if m.msb_index() > mantissa_len + 1 {
            m.shift_right(1);
            lsb += 1;
        }

        if m.msb_index() <= mantissa_len {
            // Denormal or zero: the exponent field is zero.
            return (encode(0, m.as_u64()), accuracy);
        }

        let res_exp = lsb + mantissa_len as i64;
        if res_exp > emax {
            let to_inf = rm.overflows_to_inf(sign);
            accuracy = Accuracy::from_direction(sign, to_inf);
            if to_inf {
                return (encode(all_ones, 0), accuracy);
            }
            return (encode(all_ones - 1, low_bits(mantissa_len)), accuracy);
        }

        let biased = (res_exp + bias) as u64;
        let mantissa = m.as_u64() & low_bits(mantissa_len);
        (encode(biased, mantissa), accuracy)
    }

    /// Loads a native fp32 value. The result has 24 bits of precision and
    /// holds the exact value.
    pub fn from_f32(float: f32) -> Self {
        Self::from_ieee_bits(float.to_bits() as u64, 8, 23)
    }

    /// Loads a native fp64 value. The result has 53 bits of precision and
    /// holds the exact value.
    pub fn from_f64(float: f64) -> Self {
        Self::from_ieee_bits(float.to_bits(), 11, 52)
    }

    /// Convert this float to fp32, rounding to the nearest even. Returns
    /// the value and the direction of the rounding. Large values overflow to
    /// infinity, and small values become denormals or zero.
    pub fn to_f32(&self) -> (f32, Accuracy) {
        let (bits, acc) = self.to_ieee_bits(8, 23, RoundingMode::NearestTiesToEven);
        (f32::from_bits(bits as u32), acc)
    }

    /// Convert this float to fp64, rounding to the nearest even. Returns
    /// the value and the direction of the rounding. Large values overflow to
    /// infinity, and small values become denormals or zero.
    pub fn to_f64(&self) -> (f64, Accuracy) {
        let (bits, acc) = self.to_ieee_bits(11, 52, RoundingMode::NearestTiesToEven);
        (f64::from_bits(bits), acc)
    }

    /// Convert this float to fp32 (see [`Float::to_f32`]).
    pub fn as_f32(&self) -> f32 {
        self.to_f32().0
    }

    /// Convert this float to fp64 (see [`Float::to_f64`]).
    pub fn as_f64(&self) -> f64 {
        self.to_f64().0
    }
}

#[test]
fn test_round_trip_native_float_cast() {
    let f = f32::from_bits(0x41700000);
    let a = Float::from_f32(f);
    assert_eq!(a.get_precision(), 24);
    assert_eq!(f, a.as_f32());

    let pi = 355. / 113.;
    let a = Float::from_f64(pi);
    assert_eq!(a.get_precision(), 53);
    assert_eq!(pi, a.as_f64());

    assert!(Float::from_f64(f64::NAN).is_nan());
    assert!(!Float::from_f64(f64::NAN).is_inf());
    assert!(Float::from_f64(f64::INFINITY).is_inf());
    assert!(!Float::from_f64(f64::INFINITY).is_nan());
    assert!(Float::from_f64(f64::NEG_INFINITY).is_inf());

    let a_float = f32::from_bits(0x3f8fffff);
    let a = Float::from_f32(a_float).cast(53);
    let b = a.cast(24);
    assert_eq!(a.as_f32(), a_float);
    assert_eq!(b.as_f32(), a_float);

    let f = f32::from_bits(0x000000);
    let a = Float::from_f32(f);
    assert!(!a.is_normal());
    assert_eq!(f, a.as_f32());
}

#[test]
fn test_cast_easy_ctor() {
    let values = [0x3f8fffff, 0x40800000, 0x3f000000, 0xc60b40ec, 0xbc675793];

    for v in values {
        let output = f32::from_bits(v);
        let a = Float::from_f64(output as f64);
        let b = a.cast(24);
        assert_eq!(a.as_f32(), output);
        assert_eq!(b.as_f32(), output);
        assert_eq!(b.to_f32().1, Accuracy::Exact);
    }
}

#[test]
fn test_cast_from_integers() {
    let pi = 355. / 133.;
    let e = 193. / 71.;

    assert_eq!(Float::from_i64(24, 1 << 32).as_f32(), (1u64 << 32) as f32);
    assert_eq!(Float::from_i64(24, 1 << 34).as_f32(), (1u64 << 34) as f32);
    assert_eq!(Float::from_f64(pi).cast(24).as_f32(), (pi) as f32);
    assert_eq!(Float::from_f64(e).cast(24).as_f32(), (e) as f32);
    assert_eq!(Float::from_u64(24, 8388610).as_f32(), 8388610 as f32);

    for i in 0..(1 << 16) {
        assert_eq!(Float::from_u64(24, i << 12).as_f32(), (i << 12) as f32);
    }

    assert_eq!(Float::from_i64(53, 0).as_f64(), 0.);
    // 11 bits of precision, like fp16.
    assert_eq!(Float::from_i64(11, 65500).as_f64(), 65504.0);
    assert_eq!(Float::from_i64(11, 65519).as_f64(), 65504.0);
    assert_eq!(Float::from_i64(11, 65520).as_f64(), 65536.0);
    assert_eq!(Float::from_u64(64, u64::MAX).as_f64(), u64::MAX as f64);

    for i in -100..100 {
        let a = Float::from_i64(24, i);
        let b = Float::from_f64(i as f64);
        assert_eq!(a.as_f32(), b.as_f32());
        assert_eq!(a, b);
    }
}

#[test]
fn test_cast_zero_nan_inf() {
    assert!(Float::nan(53, true).as_f64().is_nan());
    assert_eq!(Float::zero(53, false).as_f64(), 0.0);
    assert_eq!(Float::zero(53, true).as_f64().to_bits(), (-0.0f64).to_bits());

    {
        let a = Float::from_f32(f32::from_bits(0xf48fffff));
        assert!(!a.is_inf());
        assert!(!a.is_nan());
        assert!(a.is_negative());
    }
    {
        let a = Float::from_f32(f32::from_bits(0xff800000)); // -Inf
        assert!(a.is_inf());
        assert!(!a.is_nan());
        assert!(a.is_negative());
    }
    {
        let a = Float::from_f32(f32::from_bits(0xffc00000)); // -Nan.
        assert!(!a.is_inf());
        assert!(a.is_nan());
        assert!(a.is_negative());
    }
    {
        // Check that casting propagates inf/nan.
        let a = Float::from_f32(f32::from_bits(0xff800000)); // -Inf
        let b = a.cast(53);
        assert!(b.is_inf());
        assert!(!b.is_nan());
        assert!(b.is_negative());
    }
}

#[test]
fn test_cast_down_easy() {
    // Check that we can cast the numbers down, matching the hardware casting.
    for v in [0.3, 0.1, 14151241515., 14151215., 0.0000000001, 1000000000.] {
        let res = Float::from_f64(v).as_f32();
        assert_eq!(Float::from_f64(v).as_f64().to_bits(), v.to_bits());
        assert!(res == v as f32);
    }
}

#[test]
fn test_load_store_all_f32() {
    // Try to load and store normals and denormals.
    for i in 0..(1u64 << 16) {
        let in_f = f32::from_bits((i << 10) as u32);
        let fp_f = Float::from_f32(in_f);
        let (out_f, acc) = fp_f.to_f32();
        assert_eq!(in_f.is_nan(), out_f.is_nan());
        assert_eq!(in_f.is_infinite(), out_f.is_infinite());
        assert!(in_f.is_nan() || (in_f.to_bits() == out_f.to_bits()));
        assert_eq!(acc, Accuracy::Exact);
    }
}

#[test]
fn test_cast_down_complex() {
    use super::utils;

    // Try casting a bunch of difficult values such as inf, nan, denormals, etc.
    for v in utils::edge_values() {
        let res = Float::from_f64(v).as_f32();
        assert_eq!(Float::from_f64(v).as_f64().to_bits(), v.to_bits());
        assert_eq!(v.is_nan(), res.is_nan());
        assert!(v.is_nan() || res == v as f32);
    }
}

#[test]
fn test_cast_to_f32_denormals() {
    use super::utils::Lfsr;

    // Random doubles around the f32 denormal range, and around the f32
    // overflow threshold. The hardware conversion rounds once.
    let mut lfsr = Lfsr::new();
    for i in 0..50000 {
        let bits = lfsr.next_u64();
        let exp = if i % 2 == 0 {
            (bits >> 52) % 40 + 1023 - 160
        } else {
            (bits >> 52) % 6 + 1023 + 125
        };
        let v = f64::from_bits((bits & (1 << 63)) | (exp << 52) | (bits & low_bits(52)));
        let (res, acc) = Float::from_f64(v).to_f32();
        assert_eq!(res.to_bits(), (v as f32).to_bits(), "{}", v);
        let expected = if res.is_infinite() {
            if v > 0. {
                Accuracy::RoundedUp
            } else {
                Accuracy::RoundedDown
            }
        } else {
            match (res as f64).partial_cmp(&v) {
                Some(core::cmp::Ordering::Less) => Accuracy::RoundedDown,
                Some(core::cmp::Ordering::Greater) => Accuracy::RoundedUp,
                _ => Accuracy::Exact,
            }
        };
        assert_eq!(acc, expected);
    }
}

#[test]
fn test_cast_with_rm() {
    // 1 + 2^-30 does not fit in 24 bits.
    let x = Float::from_f64(1.0 + (2.0f64).powi(-30));
    let (down, acc) = x.cast_with_rm(24, RoundingMode::NearestTiesToEven);
    assert_eq!(down.as_f64(), 1.0);
    assert_eq!(acc, Accuracy::RoundedDown);
    let (up, acc) = x.cast_with_rm(24, RoundingMode::Positive);
    assert_eq!(up.as_f64(), 1.0 + (2.0f64).powi(-23));
    assert_eq!(acc, Accuracy::RoundedUp);
    let (wide, acc) = x.cast_with_rm(500, RoundingMode::Zero);
    assert_eq!(wide, x);
    assert_eq!(acc, Accuracy::Exact);

    let y = x.neg();
    let (r, acc) = y.cast_with_rm(24, RoundingMode::Negative);
    assert_eq!(r.as_f64(), -1.0 - (2.0f64).powi(-23));
    assert_eq!(acc, Accuracy::RoundedDown);
}

#[test]
fn test_scale() {
    let x = Float::from_f64(1.5);
    assert_eq!(x.scale(10).as_f64(), 1536.0);
    assert_eq!(x.scale(-3).as_f64(), 0.1875);
    assert!(x.scale(i64::MAX).is_inf());
    assert!(x.scale(i64::MIN).is_zero());
    assert!(Float::inf(53, true).scale(3).is_inf());

    // Values beyond the f64 range saturate when converted.
    assert_eq!(x.scale(2000).to_f64(), (f64::INFINITY, Accuracy::RoundedUp));
    assert_eq!(x.scale(-2000).to_f64(), (0.0, Accuracy::RoundedDown));
}
