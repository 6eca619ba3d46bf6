// crates/turbdiag-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;
mod io;
mod logging;

#[derive(Parser)]
#[command(name = "turbdiag-cli")]
#[command(about = "Turbulence diagnostics: Helmholtz decomposition and per-cube RMS", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write synthetic grid fields (.tdg)
    Synth(cmd::synth::SynthArgs),

    /// Inspect a .tdg grid (shape, unit, spacing, min/max/mean, grid id)
    Inspect(cmd::inspect::InspectArgs),

    /// Per-cube RMS of one field as JSONL
    RmsCubes(cmd::rms_cubes::RmsCubesArgs),

    /// Split a velocity field into compressive and solenoidal parts
    Decompose(cmd::decompose::DecomposeArgs),

    /// Per-cube sigma_rho / sigma_v dispersion as JSONL
    Sigma(cmd::sigma::SigmaArgs),
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Synth(args) => cmd::synth::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
        Commands::RmsCubes(args) => cmd::rms_cubes::run(args),
        Commands::Decompose(args) => cmd::decompose::run(args),
        Commands::Sigma(args) => cmd::sigma::run(args),
    }
}
