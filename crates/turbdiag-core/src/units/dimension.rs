// crates/turbdiag-core/src/units/dimension.rs

use std::fmt;

/// Physical dimension as integer exponents of the CGS base units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
}

impl Dimension {
    pub const NONE: Dimension = Dimension { length: 0, mass: 0, time: 0 };
    pub const LENGTH: Dimension = Dimension { length: 1, mass: 0, time: 0 };
    pub const MASS: Dimension = Dimension { length: 0, mass: 1, time: 0 };
    pub const TIME: Dimension = Dimension { length: 0, mass: 0, time: 1 };
    pub const VELOCITY: Dimension = Dimension { length: 1, mass: 0, time: -1 };
    pub const DENSITY: Dimension = Dimension { length: -3, mass: 1, time: 0 };

    pub fn is_dimensionless(self) -> bool {
        self == Self::NONE
    }

    /// Exponent-wise sum, `None` on `i8` overflow.
    pub fn checked_mul(self, o: Dimension) -> Option<Dimension> {
        Some(Dimension {
            length: self.length.checked_add(o.length)?,
            mass: self.mass.checked_add(o.mass)?,
            time: self.time.checked_add(o.time)?,
        })
    }

    pub fn checked_powi(self, e: i8) -> Option<Dimension> {
        Some(Dimension {
            length: self.length.checked_mul(e)?,
            mass: self.mass.checked_mul(e)?,
            time: self.time.checked_mul(e)?,
        })
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[L^{} M^{} T^{}]", self.length, self.mass, self.time)
    }
}
