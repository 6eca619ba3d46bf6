// crates/turbdiag-cli/src/cmd/mod.rs

pub mod decompose;
pub mod inspect;
pub mod rms_cubes;
pub mod sigma;
pub mod synth;
