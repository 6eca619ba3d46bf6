// crates/turbdiag-cli/src/io/mod.rs

pub mod grid_file;
pub mod jsonl;
