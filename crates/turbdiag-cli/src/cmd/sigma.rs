// crates/turbdiag-cli/src/cmd/sigma.rs

use anyhow::Context;
use clap::Args;
use turbdiag_core::dispersion::sigma_rho_sigma_v;

use crate::io::{grid_file, jsonl};

#[derive(Args, Debug)]
pub struct SigmaArgs {
    /// Density perturbation field
    #[arg(long)]
    pub delta_rho: String,

    /// Density field
    #[arg(long)]
    pub rho: String,

    /// Velocity perturbation field
    #[arg(long)]
    pub delta_v: String,

    /// Sound speed field
    #[arg(long)]
    pub sound_speed: String,

    /// Cubes per side (N)
    #[arg(long)]
    pub cubes: usize,

    /// Output JSONL path (default: stdout)
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run(args: SigmaArgs) -> anyhow::Result<()> {
    let delta_rho = grid_file::load_grid(&args.delta_rho)?;
    let rho = grid_file::load_grid(&args.rho)?;
    let delta_v = grid_file::load_grid(&args.delta_v)?;
    let cs = grid_file::load_grid(&args.sound_speed)?;

    let stats = sigma_rho_sigma_v(&delta_rho, &rho, &delta_v, &cs, args.cubes)
        .context("sigma_rho / sigma_v")?;
    jsonl::emit(args.out.as_deref(), &jsonl::sigma_lines(&stats))?;

    eprintln!(
        "cubes = {}  mean_sigma_rho = {}  mean_sigma_v = {}",
        stats.sigma_rho.len(),
        stats.sigma_rho.nan_mean(),
        stats.sigma_v.nan_mean()
    );
    Ok(())
}
