//! Fill values for `constant`

use num_complex::{Complex32, Complex64};

/// A scalar fill value
///
/// Integers keep their own variants so 64-bit fills never round-trip
/// through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Real(f64),
    Int(i64),
    UInt(u64),
    Complex(Complex64),
}

impl Scalar {
    /// Value as `f64`; complex values keep the real part
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::Real(v) => v,
            Scalar::Int(v) => v as f64,
            Scalar::UInt(v) => v as f64,
            Scalar::Complex(c) => c.re,
        }
    }

    /// Real part truncated toward zero, as C's `long long` conversion does
    ///
    /// Floats saturate at the `i64` bounds and NaN becomes 0; `u64` values
    /// above `i64::MAX` wrap.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Scalar::Real(v) => v as i64,
            Scalar::Int(v) => v,
            Scalar::UInt(v) => v as i64,
            Scalar::Complex(c) => c.re as i64,
        }
    }

    /// Real part truncated toward zero into `u64`
    ///
    /// Negative floats saturate to 0; negative integers wrap.
    pub fn as_u64(&self) -> u64 {
        match *self {
            Scalar::Real(v) => v as u64,
            Scalar::Int(v) => v as u64,
            Scalar::UInt(v) => v,
            Scalar::Complex(c) => c.re as u64,
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Real(v as f64)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::UInt(v as u64)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::UInt(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<Complex64> for Scalar {
    fn from(v: Complex64) -> Self {
        Scalar::Complex(v)
    }
}

impl From<Complex32> for Scalar {
    fn from(v: Complex32) -> Self {
        Scalar::Complex(Complex64::new(v.re as f64, v.im as f64))
    }
}
