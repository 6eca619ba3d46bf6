// crates/turbdiag-core/src/units/table.rs

use crate::units::dimension::Dimension;

const PC_CM: f64 = 3.085_677_581_491_367_3e18;
const YR_S: f64 = 3.155_76e7; // Julian year
const MSUN_G: f64 = 1.988_409_870_698_051e33;

/// One named unit: symbol, CGS scale factor, dimension.
#[derive(Clone, Copy, Debug)]
pub struct NamedUnit {
    pub symbol: &'static str,
    pub scale: f64,
    pub dim: Dimension,
}

const fn named(symbol: &'static str, scale: f64, dim: Dimension) -> NamedUnit {
    NamedUnit { symbol, scale, dim }
}

const ENERGY: Dimension = Dimension { length: 2, mass: 1, time: -2 };
const FORCE: Dimension = Dimension { length: 1, mass: 1, time: -2 };

pub const NAMED_UNITS: &[NamedUnit] = &[
    // length
    named("cm", 1.0, Dimension::LENGTH),
    named("mm", 1e-1, Dimension::LENGTH),
    named("m", 1e2, Dimension::LENGTH),
    named("km", 1e5, Dimension::LENGTH),
    named("AU", 1.495_978_707e13, Dimension::LENGTH),
    named("au", 1.495_978_707e13, Dimension::LENGTH),
    named("pc", PC_CM, Dimension::LENGTH),
    named("kpc", PC_CM * 1e3, Dimension::LENGTH),
    named("Mpc", PC_CM * 1e6, Dimension::LENGTH),
    // mass
    named("g", 1.0, Dimension::MASS),
    named("kg", 1e3, Dimension::MASS),
    named("Msun", MSUN_G, Dimension::MASS),
    named("solMass", MSUN_G, Dimension::MASS),
    // time
    named("s", 1.0, Dimension::TIME),
    named("min", 60.0, Dimension::TIME),
    named("h", 3600.0, Dimension::TIME),
    named("d", 86_400.0, Dimension::TIME),
    named("yr", YR_S, Dimension::TIME),
    named("kyr", YR_S * 1e3, Dimension::TIME),
    named("Myr", YR_S * 1e6, Dimension::TIME),
    named("Gyr", YR_S * 1e9, Dimension::TIME),
    // derived
    named("erg", 1.0, ENERGY),
    named("J", 1e7, ENERGY),
    named("dyn", 1.0, FORCE),
    named("N", 1e5, FORCE),
    named("Ba", 1.0, Dimension { length: -1, mass: 1, time: -2 }),
];

pub fn lookup(symbol: &str) -> Option<&'static NamedUnit> {
    NAMED_UNITS.iter().find(|u| u.symbol == symbol)
}
