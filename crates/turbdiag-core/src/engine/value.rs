// crates/turbdiag-core/src/engine/value.rs

use ndarray::Array3;

use crate::engine::EngineError;

/// Engine-side value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Array(ColumnMajor),
}

/// Flat 3D array in column-major order: the first index varies fastest.
/// `data[i1 + n1 * (i2 + n2 * i3)]` holds element `(i1, i2, i3)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMajor {
    pub dims: [usize; 3],
    pub data: Vec<f64>,
}

impl ColumnMajor {
    /// Flatten a logically indexed array into engine order.
    pub fn from_array(a: &Array3<f64>) -> Self {
        let (n1, n2, n3) = a.dim();
        // a.t() walks a's first axis fastest.
        let data = a.t().iter().copied().collect();
        Self {
            dims: [n1, n2, n3],
            data,
        }
    }
}

impl Value {
    pub fn as_f64(&self) -> Result<f64, EngineError> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            Value::Array(_) => Err(EngineError::Type("expected scalar, got array".into())),
        }
    }

    pub fn as_i64(&self) -> Result<i64, EngineError> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            Value::Float(f) => Err(EngineError::Type(format!("expected integer, got {f}"))),
            Value::Array(_) => Err(EngineError::Type("expected integer, got array".into())),
        }
    }

    pub fn into_array(self) -> Result<ColumnMajor, EngineError> {
        match self {
            Value::Array(a) => Ok(a),
            _ => Err(EngineError::Type("expected array, got scalar".into())),
        }
    }
}
