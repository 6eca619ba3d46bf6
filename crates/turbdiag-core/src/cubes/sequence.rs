// crates/turbdiag-core/src/cubes/sequence.rs

use crate::units::{Quantity, Unit};

/// Per-cube RMS values sharing one unit, in row-major (i, j, k) order.
#[derive(Clone, Debug, PartialEq)]
pub struct RmsSequence {
    values: Vec<f64>,
    unit: Unit,
    cubes_per_side: usize,
}

impl RmsSequence {
    pub(crate) fn new(values: Vec<f64>, unit: Unit, cubes_per_side: usize) -> Self {
        Self {
            values,
            unit,
            cubes_per_side,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn cubes_per_side(&self) -> usize {
        self.cubes_per_side
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Quantity> {
        self.values
            .get(idx)
            .map(|&v| Quantity::new(v, self.unit.clone()))
    }

    pub fn at(&self, i: usize, j: usize, k: usize) -> Option<Quantity> {
        let n = self.cubes_per_side;
        if i >= n || j >= n || k >= n {
            return None;
        }
        self.get((i * n + j) * n + k)
    }

    pub fn iter(&self) -> impl Iterator<Item = Quantity> + '_ {
        self.values
            .iter()
            .map(move |&v| Quantity::new(v, self.unit.clone()))
    }

    /// Mean over the non-NaN cubes; NaN when every cube is NaN.
    pub fn nan_mean(&self) -> f64 {
        let (sum, count) = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }
}
