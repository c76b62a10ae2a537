//! Correctly rounded square root of arbitrary-precision floating point
//! numbers.
//!
//! The square root is computed with a Newton iteration that doubles the
//! working precision on every step, runs the last steps with 64 guard bits,
//! and rounds once to the precision of the input. The result is the
//! round-to-nearest-even square root, together with the direction of the
//! rounding.
//!
//! ```
//!    use sqrtfloat::{Accuracy, Float};
//!
//!    let x = Float::from_u64(53, 2);
//!    let (root, acc) = x.sqrt().unwrap();
//!    assert_eq!(root.as_f64(), std::f64::consts::SQRT_2);
//!    assert_eq!(acc, Accuracy::RoundedUp);
//!
//!    // Precision is carried by the value.
//!    let x = Float::parse(200, "2").unwrap();
//!    let (root, _) = x.sqrt().unwrap();
//!    assert_eq!(root.get_precision(), 200);
//! ```
//!
//! The algorithm is generic over the [`SqrtFloat`] capability trait, so any
//! arbitrary-precision backend that can add, divide and round at a given
//! precision can reuse it. [`Float`] is the backend shipped with the crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod arithmetic;
mod bigint;
mod cast;
mod error;
mod float;
mod sqrt;
mod string;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::bigint::BigInt;
pub use self::error::{ParseError, SqrtError};
pub use self::float::{
    Accuracy, Category, Float, RoundingMode, EXP_MAX, EXP_MIN,
};
pub use self::sqrt::{
    precision_schedule, sqrt, SqrtFloat, GUARD_BITS, SEED_PRECISION, SETTLE_PASSES,
};
pub use self::utils::Lfsr;
