// crates/turbdiag-core/src/units/mod.rs

pub mod dimension;
pub mod parse;
pub mod quantity;
pub mod table;
pub mod unit;

pub use dimension::Dimension;
pub use quantity::Quantity;
pub use unit::Unit;
