pub mod error;
pub mod validate;

pub mod units;
pub mod field;
pub mod engine;
pub mod decompose;
pub mod cubes;
pub mod dispersion;
pub mod config;
pub mod format;

pub use crate::config::SolverConfig;
pub use crate::cubes::{compute_rms_in_cubes, CubePartition, RmsSequence};
pub use crate::decompose::{DecompositionResult, FieldDecomposer, SolverReport};
pub use crate::error::{DiagError, Result};
pub use crate::field::{GridField, VectorField3D};
pub use crate::units::{Dimension, Quantity, Unit};
