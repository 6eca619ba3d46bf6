// crates/turbdiag-core/src/field/vector.rs

use crate::error::{DiagError, Result};
use crate::field::grid::GridField;

/// Three grid components of a vector field.
///
/// Components must share one shape and one physical dimension; each keeps its
/// own unit so results can be handed back in the caller's units.
#[derive(Clone, Debug)]
pub struct VectorField3D {
    pub x: GridField,
    pub y: GridField,
    pub z: GridField,
}

impl VectorField3D {
    pub fn new(x: GridField, y: GridField, z: GridField) -> Result<Self> {
        let v = Self { x, y, z };
        v.validate()?;
        Ok(v)
    }

    pub fn validate(&self) -> Result<()> {
        self.x.ensure_same_shape(&self.y, "vector components x/y")?;
        self.x.ensure_same_shape(&self.z, "vector components x/z")?;
        let d = self.x.unit().dimension();
        for (name, c) in [("y", &self.y), ("z", &self.z)] {
            if c.unit().dimension() != d {
                return Err(DiagError::Unit(format!(
                    "vector component {name} has unit '{}', x has '{}'",
                    c.unit(),
                    self.x.unit()
                )));
            }
        }
        Ok(())
    }

    pub fn shape(&self) -> [usize; 3] {
        self.x.shape()
    }

    pub fn components(&self) -> [&GridField; 3] {
        [&self.x, &self.y, &self.z]
    }
}
