// crates/turbdiag-core/src/field/mod.rs

pub mod grid;
pub mod vector;

pub use grid::{FieldSummary, GridField};
pub use vector::VectorField3D;
