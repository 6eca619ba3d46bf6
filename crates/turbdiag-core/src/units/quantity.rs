// crates/turbdiag-core/src/units/quantity.rs

use std::fmt;

use crate::error::{DiagError, Result};
use crate::units::dimension::Dimension;
use crate::units::unit::Unit;

/// A scalar value with a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Parse `"<number> <unit>"`, e.g. `"0.5 kpc"`. A bare number is dimensionless.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (num, unit) = match s.split_once(char::is_whitespace) {
            Some((n, u)) => (n, u),
            None => (s, ""),
        };
        let value = num
            .parse::<f64>()
            .map_err(|_| DiagError::Unit(format!("bad quantity '{s}'")))?;
        Ok(Self {
            value,
            unit: Unit::parse(unit)?,
        })
    }

    pub fn to(&self, unit: &Unit) -> Result<Quantity> {
        let f = self.unit.conversion_factor(unit)?;
        Ok(Quantity {
            value: self.value * f,
            unit: unit.clone(),
        })
    }

    pub fn cgs(&self) -> Quantity {
        Quantity {
            value: self.value * self.unit.scale(),
            unit: self.unit.cgs(),
        }
    }

    /// Fails unless the quantity has the expected dimension.
    pub fn expect_dimension(&self, dim: Dimension, what: &str) -> Result<()> {
        if self.unit.dimension() != dim {
            return Err(DiagError::Unit(format!(
                "{what} must have dimension {dim}, got '{}' {}",
                self.unit,
                self.unit.dimension()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.symbol().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
