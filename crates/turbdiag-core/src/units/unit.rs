// crates/turbdiag-core/src/units/unit.rs

use std::fmt;

use crate::error::{DiagError, Result};
use crate::units::dimension::Dimension;
use crate::units::table;

/// A physical unit: a product of named factors with integer exponents,
/// plus the derived CGS scale factor and dimension.
///
/// `km s**-1` has scale 1e5 and dimension [L^1 T^-1]. Two units compare equal
/// when they describe the same dimension with the same scale, regardless of
/// how they are spelled.
#[derive(Clone, Debug)]
pub struct Unit {
    factors: Vec<(String, i8)>,
    scale: f64,
    dim: Dimension,
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self {
            factors: Vec::new(),
            scale: 1.0,
            dim: Dimension::NONE,
        }
    }

    /// A single named unit from the built-in table (`cm`, `kpc`, `Msun`, ...).
    pub fn named(symbol: &str) -> Result<Self> {
        let u = table::lookup(symbol)
            .ok_or_else(|| DiagError::Unit(format!("unknown unit '{symbol}'")))?;
        Ok(Self {
            factors: vec![(u.symbol.to_string(), 1)],
            scale: u.scale,
            dim: u.dim,
        })
    }

    /// Parse an astropy-style unit string, e.g. `km/s`, `g/cm**3`, `Msun kpc^-3`.
    pub fn parse(s: &str) -> Result<Self> {
        crate::units::parse::parse_unit(s)
    }

    /// The CGS unit for a dimension (scale 1).
    pub fn cgs_of(dim: Dimension) -> Self {
        let mut factors = Vec::new();
        for (name, e) in [("g", dim.mass), ("cm", dim.length), ("s", dim.time)] {
            if e != 0 {
                factors.push((name.to_string(), e));
            }
        }
        Self {
            factors,
            scale: 1.0,
            dim,
        }
    }

    pub fn cgs(&self) -> Self {
        Self::cgs_of(self.dim)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dim.is_dimensionless()
    }

    pub fn symbol(&self) -> String {
        self.factors
            .iter()
            .map(|(name, e)| {
                if *e == 1 {
                    name.clone()
                } else {
                    format!("{name}**{e}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Multiplicative factor taking a value in `self` to a value in `to`.
    pub fn conversion_factor(&self, to: &Unit) -> Result<f64> {
        if self.dim != to.dim {
            return Err(DiagError::Unit(format!(
                "cannot convert '{}' {} to '{}' {}",
                self.symbol(),
                self.dim,
                to.symbol(),
                to.dim
            )));
        }
        Ok(self.scale / to.scale)
    }

    pub fn mul(&self, o: &Unit) -> Result<Unit> {
        let mut factors = self.factors.clone();
        for (name, e) in &o.factors {
            push_factor(&mut factors, name, *e)?;
        }
        let dim = self.dim.checked_mul(o.dim).ok_or_else(|| overflow(self, o))?;
        checked(Unit {
            factors,
            scale: self.scale * o.scale,
            dim,
        })
    }

    pub fn div(&self, o: &Unit) -> Result<Unit> {
        self.mul(&o.powi(-1)?)
    }

    pub fn powi(&self, e: i8) -> Result<Unit> {
        let mut factors = Vec::with_capacity(self.factors.len());
        for (name, x) in &self.factors {
            let p = x.checked_mul(e).ok_or_else(|| overflow(self, self))?;
            if p != 0 {
                factors.push((name.clone(), p));
            }
        }
        let dim = self.dim.checked_powi(e).ok_or_else(|| overflow(self, self))?;
        checked(Unit {
            factors,
            scale: self.scale.powi(e as i32),
            dim,
        })
    }

    pub(crate) fn from_parts(factors: Vec<(String, i8)>, scale: f64, dim: Dimension) -> Result<Self> {
        let mut merged = Vec::with_capacity(factors.len());
        for (name, e) in factors {
            push_factor(&mut merged, &name, e)?;
        }
        checked(Self {
            factors: merged,
            scale,
            dim,
        })
    }
}

fn overflow(a: &Unit, b: &Unit) -> DiagError {
    DiagError::Unit(format!("unit exponent out of range combining '{a}' and '{b}'"))
}

/// Scale must stay a usable positive number.
fn checked(u: Unit) -> Result<Unit> {
    if !(u.scale > 0.0) || !u.scale.is_finite() {
        return Err(DiagError::Unit(format!(
            "unit '{}' has no finite CGS scale",
            u.symbol()
        )));
    }
    Ok(u)
}

fn push_factor(factors: &mut Vec<(String, i8)>, name: &str, e: i8) -> Result<()> {
    if let Some(pos) = factors.iter().position(|(n, _)| n == name) {
        let sum = factors[pos].1.checked_add(e).ok_or_else(|| {
            DiagError::Unit(format!("exponent of '{name}' out of range"))
        })?;
        if sum == 0 {
            factors.remove(pos);
        } else {
            factors[pos].1 = sum;
        }
    } else if e != 0 {
        factors.push((name.to_string(), e));
    }
    Ok(())
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        let tol = 1e-12 * self.scale.abs().max(other.scale.abs());
        self.dim == other.dim && (self.scale - other.scale).abs() <= tol
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::dimensionless()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}
