//! Values held in the shared environment.
//!
//! Every variable an agent reads or writes is a [`Value`]. Numeric
//! policies mostly traffic in [`Value::Float`]; [`Value::Complex`] appears
//! when a closed-form policy raises a negative base to a fractional power,
//! and [`Value::Unit`] is what observer agents return.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A single environment value.
///
/// Serializes untagged, so a snapshot renders as plain JSON numbers and
/// booleans (complex values as `[re, im]`, unit as `null`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// An integer quantity (counts, step indices, defection thresholds).
    Int(i64),
    /// A real number.
    Float(f64),
    /// A complex number.
    Complex(Complex64),
    /// No value. Produced by observer agents.
    Unit,
}

impl Value {
    /// Name of the variant, used in type-mismatch errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Complex(_) => "complex",
            Self::Unit => "unit",
        }
    }

    /// Numeric view of the value.
    ///
    /// Integers widen to `f64`. Booleans, complex numbers, and unit have no
    /// real view and return `None`; use [`crate::numeric::real_part`] to
    /// project a complex value onto the real line.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(x) => Some(x),
            Self::Int(i) => Some(i as f64),
            Self::Bool(_) | Self::Complex(_) | Self::Unit => None,
        }
    }

    /// Integer view of the value. Only [`Value::Int`] qualifies.
    pub const fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Boolean view of the value. Only [`Value::Bool`] qualifies.
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Complex view of the value. Real numbers embed with a zero
    /// imaginary part.
    pub fn as_complex(&self) -> Option<Complex64> {
        match *self {
            Self::Complex(c) => Some(c),
            _ => self.as_f64().map(|re| Complex64::new(re, 0.0)),
        }
    }

    /// Whether this is [`Value::Unit`].
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Complex(c) => write!(f, "{c}"),
            Self::Unit => f.write_str("()"),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Complex64> for Value {
    fn from(c: Complex64) -> Self {
        Self::Complex(c)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Unit
    }
}
