// crates/turbdiag-core/src/format/mod.rs

pub mod checksum;
pub mod grid;

pub use grid::{decode, encode, grid_id_hex};
