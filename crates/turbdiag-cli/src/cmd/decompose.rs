// crates/turbdiag-cli/src/cmd/decompose.rs

use anyhow::{anyhow, Context};
use clap::Args;
use turbdiag_core::{FieldDecomposer, Quantity, SolverConfig, VectorField3D};

use crate::io::grid_file;

#[derive(Args, Debug)]
pub struct DecomposeArgs {
    /// Velocity x1 component
    #[arg(long)]
    pub vx: String,

    /// Velocity x2 component
    #[arg(long)]
    pub vy: String,

    /// Velocity x3 component
    #[arg(long)]
    pub vz: String,

    /// Density field
    #[arg(long)]
    pub rho: String,

    /// Grid spacing, e.g. "0.5 kpc" (default: spacing stored in --vx)
    #[arg(long)]
    pub dx: Option<String>,

    /// Solver settings (TOML)
    #[arg(long)]
    pub config: Option<String>,

    /// Output prefix: writes <prefix>_{vx,vy,vz}_{comp,sole}.tdg
    #[arg(long)]
    pub out_prefix: String,

    /// Exit with an error when the Poisson solve did not converge
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

pub fn run(args: DecomposeArgs) -> anyhow::Result<()> {
    let cfg = match args.config.as_deref() {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };

    let vx = grid_file::load_grid(&args.vx)?;
    let vy = grid_file::load_grid(&args.vy)?;
    let vz = grid_file::load_grid(&args.vz)?;
    let rho = grid_file::load_grid(&args.rho)?;

    let dx = match args.dx.as_deref() {
        Some(s) => Quantity::parse(s).with_context(|| format!("parse --dx {s}"))?,
        None => vx
            .spacing()
            .cloned()
            .ok_or_else(|| anyhow!("{} stores no grid spacing; pass --dx", args.vx))?,
    };

    let velocity = VectorField3D::new(vx, vy, vz)?;
    let mut decomposer = FieldDecomposer::native(&cfg)?;
    let result = decomposer.decompose(&velocity, &rho, &dx)?;

    let (compressive, solenoidal, rep) = result.into_parts();
    let outputs = [
        ("vx_comp", compressive.x),
        ("vy_comp", compressive.y),
        ("vz_comp", compressive.z),
        ("vx_sole", solenoidal.x),
        ("vy_sole", solenoidal.y),
        ("vz_sole", solenoidal.z),
    ];
    for (name, field) in outputs {
        let path = format!("{}_{name}.tdg", args.out_prefix);
        let field = field.with_spacing(dx.clone())?;
        grid_file::save_grid(&path, &field)?;
    }

    println!("--- decompose ---");
    println!("method      = {:?}", cfg.method);
    println!("weighting   = {:?}", cfg.weighting);
    println!("iterations  = {}", opt(rep.iterations));
    println!("residual    = {}", opt(rep.residual));
    println!("tolerance   = {}", rep.tolerance);
    println!("converged   = {}", rep.converged);
    println!("faults      = {}", rep.faults.len());
    for f in &rep.faults {
        println!("  line {}: {} ({})", f.line, f.command, f.detail);
    }
    println!("out_prefix  = {}", args.out_prefix);

    if args.strict && !rep.converged {
        return Err(anyhow!("poisson solve did not converge (residual {})", opt(rep.residual)));
    }
    Ok(())
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "n/a".to_string())
}
