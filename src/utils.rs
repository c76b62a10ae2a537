//! Bit helpers and a deterministic random source for tests and benchmarks.

/// Returns a word whose low `bits` bits are set.
pub fn low_bits(bits: usize) -> u64 {
    if bits >= 64 {
        return u64::MAX;
    }
    (1u64 << bits) - 1
}

#[test]
fn test_low_bits() {
    assert_eq!(low_bits(0), 0);
    assert_eq!(low_bits(1), 1);
    assert_eq!(low_bits(11), 0x7ff);
    assert_eq!(low_bits(52), 0xf_ffff_ffff_ffff);
    assert_eq!(low_bits(64), u64::MAX);
}

/// Values where rounding and classification tend to go wrong: signed zeros,
/// infinities, NaNs, the edges of the f64 range, powers of two and their
/// neighbors, and perfect squares. Their quotients never round twice on
/// the f64 denormal grid.
#[cfg(test)]
pub fn edge_values() -> [f64; 22] {
    [
        0.0,
        -0.0,
        f64::NAN,
        -f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::MIN_POSITIVE,
        f64::MAX,
        f64::MIN,
        f64::EPSILON,
        1.0,
        -1.0,
        1.0 - f64::EPSILON / 2.0,
        1.0 + f64::EPSILON,
        4.0,
        0.25,
        144.0,
        -0.5,
        0.1,
        1e-300,
        2.25,
        core::f64::consts::PI,
    ]
}

/// A linear-feedback shift register in the xorshift form. This is a
/// deterministic random number generator for the tests and benchmarks.
pub struct Lfsr {
    state: u64,
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new()
    }
}

impl Lfsr {
    const INIT: u64 = 0x2545_f491_4f6c_dd1d;

    /// Returns a generator with the default state.
    pub fn new() -> Lfsr {
        Lfsr { state: Self::INIT }
    }

    /// Returns a generator whose state is derived from `seed`.
    pub fn new_with_seed(seed: u64) -> Lfsr {
        let state = Self::INIT ^ seed.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        // The all-zero state is a fixed point.
        Lfsr {
            state: if state == 0 { Self::INIT } else { state },
        }
    }

    /// Returns the next 64 random bits.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns a random f64 in [0, 1), on a grid of 2^-53.
    pub fn next_unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a random f32 in [0, 1), on a grid of 2^-24.
    pub fn next_unit_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }
}

impl Iterator for Lfsr {
    type Item = u64;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_u64())
    }
}

#[test]
fn test_lfsr_balance() {
    let mut lfsr = Lfsr::new();
    let mut ones = 0;
    for _ in 0..10_000 {
        ones += lfsr.next_u64().count_ones();
    }
    // Roughly half of the bits are set.
    let total = 64 * 10_000;
    assert!(ones * 100 < total * 52);
    assert!(ones * 100 > total * 48);
}

#[test]
fn test_lfsr_seeds() {
    let first: [u64; 4] = core::array::from_fn(|_| Lfsr::new().next_u64());
    assert!(first.iter().all(|&v| v == first[0]));

    let mut a = Lfsr::new_with_seed(1);
    let mut b = Lfsr::new_with_seed(2);
    assert_ne!(a.next_u64(), b.next_u64());

    // No short cycles.
    let mut lfsr = Lfsr::new_with_seed(3);
    let head = lfsr.next_u64();
    assert!(lfsr.take(50_000).all(|v| v != head));
}

#[test]
fn test_unit_samples() {
    let mut lfsr = Lfsr::new();
    let mut low = 0;
    for _ in 0..10_000 {
        let d = lfsr.next_unit_f64();
        let s = lfsr.next_unit_f32();
        assert!((0.0..1.0).contains(&d));
        assert!((0.0..1.0).contains(&s));
        low += (d < 0.5) as usize;
    }
    assert!(low > 4_500 && low < 5_500);
}
