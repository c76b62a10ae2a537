use crate::{precision_schedule, Accuracy, Float, RoundingMode};
use pyo3::basic::CompareOp;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::format;
use std::string::{String, ToString};
use std::vec::Vec;

fn check_precision(precision: usize) -> PyResult<()> {
    if precision == 0 {
        return Err(PyValueError::new_err("The precision must be positive"));
    }
    Ok(())
}

fn with_accuracy(inner: Float, acc: Accuracy) -> (PyFloat, String) {
    (PyFloat { inner }, acc.as_str().to_string())
}

/// An arbitrary-precision binary floating-point number.
///
/// Each number carries its own precision, the number of bits in the
/// significand. The square root of a number has the same precision.
#[pyclass(frozen)]
struct PyFloat {
    inner: Float,
}

#[pymethods]
impl PyFloat {
    /// Create a number from a decimal string, such as "1.5e-3", "inf" or
    /// "nan", correctly rounded to `precision` bits.
    #[new]
    fn new(value: &str, precision: usize) -> PyResult<Self> {
        check_precision(precision)?;
        let inner = Float::parse(precision, value)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyFloat { inner })
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("PyFloat(\"{}\", {})", self.inner, self.inner.get_precision())
    }

    /// The nearest Python float.
    fn __float__(&self) -> f64 {
        self.inner.as_f64()
    }

    fn __richcmp__(&self, other: &PyFloat, op: CompareOp) -> bool {
        match self.inner.partial_cmp(&other.inner) {
            Some(ord) => op.matches(ord),
            // NaN is unordered.
            None => matches!(op, CompareOp::Ne),
        }
    }

    fn get_precision(&self) -> usize {
        self.inner.get_precision()
    }

    /// Returns e, for a normal number m * 2^e with m in [1, 2).
    fn get_exponent(&self) -> i64 {
        self.inner.get_exp()
    }

    /// One of "Normal", "Zero", "Infinity", "NaN".
    fn get_category(&self) -> String {
        format!("{:?}", self.inner.get_category())
    }

    fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }
    fn is_inf(&self) -> bool {
        self.inner.is_inf()
    }
    fn is_nan(&self) -> bool {
        self.inner.is_nan()
    }
    fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }
    fn is_normal(&self) -> bool {
        self.inner.is_normal()
    }

    /// Returns the correctly rounded square root, and the direction of the
    /// rounding: "Exact", "RoundedDown" or "RoundedUp".
    ///
    /// Raises:
    ///     ValueError: if the number is negative.
    fn sqrt(&self) -> PyResult<(PyFloat, String)> {
        let (root, acc) = self
            .inner
            .sqrt()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(with_accuracy(root, acc))
    }

    /// Round to `precision` bits with the rounding mode `rm`, one of
    /// "NearestTiesToEven", "NearestTiesToAway", "Zero", "Positive" or
    /// "Negative". Returns the number and the direction of the rounding.
    #[pyo3(signature = (precision, rm = "NearestTiesToEven"))]
    fn cast(&self, precision: usize, rm: &str) -> PyResult<(PyFloat, String)> {
        check_precision(precision)?;
        let rm = RoundingMode::from_string(rm)
            .ok_or_else(|| PyValueError::new_err(format!("Invalid rounding mode: {}", rm)))?;
        let (inner, acc) = self.inner.cast_with_rm(precision, rm);
        Ok(with_accuracy(inner, acc))
    }

    /// Prints the internal representation to stdout.
    fn dump(&self) {
        self.inner.dump();
    }
}

/// Returns the square root of `x` and the direction of the rounding.
///
/// Raises:
///     ValueError: if the number is negative.
#[pyfunction]
fn sqrt(x: &PyFloat) -> PyResult<(PyFloat, String)> {
    x.sqrt()
}

/// Create a number with `precision` bits from a Python float, rounding to
/// the nearest even if the precision is below 53.
#[pyfunction]
#[pyo3(signature = (value, precision = 53))]
fn from_float(value: f64, precision: usize) -> PyResult<PyFloat> {
    check_precision(precision)?;
    Ok(PyFloat {
        inner: Float::from_f64(value).cast(precision),
    })
}

/// Create a number with `precision` bits from an integer.
#[pyfunction]
fn from_int(value: i64, precision: usize) -> PyResult<PyFloat> {
    check_precision(precision)?;
    Ok(PyFloat {
        inner: Float::from_i64(precision, value),
    })
}

/// The working precisions of the Newton steps for a root with `precision`
/// bits.
#[pyfunction]
fn schedule(precision: usize) -> Vec<usize> {
    precision_schedule(precision)
}

#[pymodule]
fn sqrtfloat(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFloat>()?;
    m.add_function(wrap_pyfunction!(sqrt, m)?)?;
    m.add_function(wrap_pyfunction!(from_float, m)?)?;
    m.add_function(wrap_pyfunction!(from_int, m)?)?;
    m.add_function(wrap_pyfunction!(schedule, m)?)?;
    Ok(())
}
