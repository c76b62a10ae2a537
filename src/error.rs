//! Error types of the crate.

use thiserror::Error;

/// The error returned by the square root of a number outside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SqrtError {
    /// The input is negative (including negative infinity). Negative zero is
    /// not an error; its root is negative zero.
    #[error("square root of a negative number")]
    Domain,
}

/// The error returned when a decimal string can't be parsed into a float.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the input provided was empty")]
    InputEmpty,
    #[error("failed parsing the number part of the floating point number")]
    InvalidNumber,
    #[error("failed parsing the exponent of the floating point number")]
    InvalidExponent,
    #[error("the decimal exponent {0} is outside of the supported range")]
    ExponentOverflow(i64),
}
