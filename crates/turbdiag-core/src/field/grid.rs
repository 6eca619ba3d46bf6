// crates/turbdiag-core/src/field/grid.rs

use ndarray::{Array3, Zip};

use crate::error::{DiagError, Result};
use crate::units::{Dimension, Quantity, Unit};

/// A scalar field on a uniform 3D grid.
///
/// Axis 0 is x1, axis 2 is x3. Spacing is optional because derived fields
/// (ratios, perturbations) are often handled without it.
#[derive(Clone, Debug)]
pub struct GridField {
    values: Array3<f64>,
    unit: Unit,
    spacing: Option<Quantity>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub non_finite: usize,
}

impl GridField {
    pub fn new(values: Array3<f64>, unit: Unit) -> Self {
        Self {
            values,
            unit,
            spacing: None,
        }
    }

    /// Build from a flat row-major buffer.
    pub fn from_shape_vec(shape: [usize; 3], data: Vec<f64>, unit: Unit) -> Result<Self> {
        let total = shape[0] * shape[1] * shape[2];
        if data.len() != total {
            return Err(DiagError::ShapeMismatch(format!(
                "shape {shape:?} needs {total} values, got {}",
                data.len()
            )));
        }
        let values = Array3::from_shape_vec((shape[0], shape[1], shape[2]), data)
            .map_err(|e| DiagError::ShapeMismatch(e.to_string()))?;
        Ok(Self::new(values, unit))
    }

    pub fn uniform(shape: [usize; 3], value: f64, unit: Unit) -> Self {
        Self::new(Array3::from_elem((shape[0], shape[1], shape[2]), value), unit)
    }

    /// Attach a grid spacing; it must be a length.
    pub fn with_spacing(mut self, dx: Quantity) -> Result<Self> {
        dx.expect_dimension(Dimension::LENGTH, "grid spacing")?;
        self.spacing = Some(dx);
        Ok(self)
    }

    pub fn shape(&self) -> [usize; 3] {
        let (a, b, c) = self.values.dim();
        [a, b, c]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array3<f64> {
        self.values
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn spacing(&self) -> Option<&Quantity> {
        self.spacing.as_ref()
    }

    /// Edge length of a cubic field; non-cubic fields are rejected.
    pub fn edge_length(&self) -> Result<usize> {
        let s = self.shape();
        if s[0] != s[1] || s[1] != s[2] {
            return Err(DiagError::NonCubicGrid(s));
        }
        Ok(s[0])
    }

    pub fn ensure_same_shape(&self, other: &GridField, what: &str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(DiagError::ShapeMismatch(format!(
                "{what}: {:?} vs {:?}",
                self.shape(),
                other.shape()
            )));
        }
        Ok(())
    }

    pub fn to_unit(&self, unit: &Unit) -> Result<GridField> {
        let f = self.unit.conversion_factor(unit)?;
        Ok(Self {
            values: self.values.mapv(|v| v * f),
            unit: unit.clone(),
            spacing: self.spacing.clone(),
        })
    }

    /// Values expressed in the CGS unit of the field's dimension.
    pub fn cgs_values(&self) -> Array3<f64> {
        let s = self.unit.scale();
        self.values.mapv(|v| v * s)
    }

    /// Element-wise `self / denom` with combined units. A ratio whose
    /// dimension cancels and whose scales agree comes out dimensionless.
    pub fn ratio(&self, denom: &GridField) -> Result<GridField> {
        self.ensure_same_shape(denom, "ratio operands")?;
        let mut unit = self.unit.div(&denom.unit)?;
        let mut values = Zip::from(&self.values)
            .and(&denom.values)
            .map_collect(|a, b| a / b);
        if unit.is_dimensionless() {
            let s = unit.scale();
            if s != 1.0 {
                values.mapv_inplace(|v| v * s);
            }
            unit = Unit::dimensionless();
        }
        Ok(Self {
            values,
            unit,
            spacing: self.spacing.clone(),
        })
    }

    pub fn summary(&self) -> FieldSummary {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut finite = 0usize;
        let mut non_finite = 0usize;
        for &v in self.values.iter() {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
                sum += v;
                finite += 1;
            } else {
                non_finite += 1;
            }
        }
        let mean = if finite == 0 { f64::NAN } else { sum / finite as f64 };
        if finite == 0 {
            min = f64::NAN;
            max = f64::NAN;
        }
        FieldSummary {
            min,
            max,
            mean,
            non_finite,
        }
    }
}
