// crates/turbdiag-cli/src/cmd/rms_cubes.rs

use anyhow::Context;
use clap::Args;
use turbdiag_core::{compute_rms_in_cubes, Unit};

use crate::io::{grid_file, jsonl};

#[derive(Args, Debug)]
pub struct RmsCubesArgs {
    /// Input .tdg path (must be a cubic grid)
    #[arg(long)]
    pub r#in: String,

    /// Cubes per side (N); N^3 values are produced
    #[arg(long)]
    pub cubes: usize,

    /// Convert the field to this unit before aggregating
    #[arg(long)]
    pub unit: Option<String>,

    /// Output JSONL path (default: stdout)
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run(args: RmsCubesArgs) -> anyhow::Result<()> {
    let mut field = grid_file::load_grid(&args.r#in)?;
    if let Some(u) = args.unit.as_deref() {
        let unit = Unit::parse(u).with_context(|| format!("parse --unit {u}"))?;
        field = field.to_unit(&unit)?;
    }

    let seq = compute_rms_in_cubes(&field, args.cubes)
        .with_context(|| format!("rms in {} cubes of {}", args.cubes, args.r#in))?;
    jsonl::emit(args.out.as_deref(), &jsonl::rms_lines(&seq))?;

    eprintln!(
        "cubes = {}  unit = {}  nan_mean = {}",
        seq.len(),
        seq.unit(),
        seq.nan_mean()
    );
    Ok(())
}
