// crates/turbdiag-cli/src/cmd/synth.rs

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use ndarray::Array3;
use turbdiag_core::{GridField, Quantity, Unit};

use crate::io::grid_file;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SynthKind {
    /// One scalar field of constant --value
    Uniform,
    /// Curl-free velocity (plus uniform density)
    Irrotational,
    /// Divergence-free velocity (plus uniform density)
    Solenoidal,
    /// Sum of the irrotational and solenoidal fields
    Mixed,
}

#[derive(Args, Debug)]
pub struct SynthArgs {
    #[arg(long, value_enum)]
    pub kind: SynthKind,

    /// Grid edge length (cells per axis)
    #[arg(long, default_value_t = 16)]
    pub n: usize,

    /// Unit of the written field(s)
    #[arg(long, default_value = "km/s")]
    pub unit: String,

    /// Grid spacing stored in the header, e.g. "0.5 kpc"
    #[arg(long, default_value = "1 pc")]
    pub dx: String,

    /// Constant for --kind uniform
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub value: f64,

    /// Peak amplitude of the velocity modes
    #[arg(long, default_value_t = 10.0)]
    pub amplitude: f64,

    /// Density written next to velocity fields
    #[arg(long, default_value = "1e-24 g/cm**3")]
    pub density: String,

    /// Output file (uniform) or prefix: writes <out>_vx.tdg, _vy, _vz, _rho
    #[arg(long)]
    pub out: String,
}

pub fn run(args: SynthArgs) -> anyhow::Result<()> {
    if args.n == 0 {
        bail!("--n must be at least 1");
    }
    let unit = Unit::parse(&args.unit).with_context(|| format!("parse --unit {}", args.unit))?;
    let dx = Quantity::parse(&args.dx).with_context(|| format!("parse --dx {}", args.dx))?;
    let n = args.n;

    let a = args.amplitude;
    let parts = match args.kind {
        SynthKind::Uniform => {
            let f = GridField::uniform([n, n, n], args.value, unit).with_spacing(dx)?;
            grid_file::save_grid(&args.out, &f)?;
            eprintln!("wrote {} ({n}^3, {})", args.out, f.unit());
            return Ok(());
        }
        SynthKind::Irrotational => irrotational(n, a),
        SynthKind::Solenoidal => solenoidal(n, a),
        SynthKind::Mixed => {
            let [ix, iy, iz] = irrotational(n, a);
            let [sx, sy, sz] = solenoidal(n, 0.6 * a);
            [ix + sx, iy + sy, iz + sz]
        }
    };

    for (name, values) in ["vx", "vy", "vz"].into_iter().zip(parts) {
        let path = format!("{}_{name}.tdg", args.out);
        let f = GridField::new(values, unit.clone()).with_spacing(dx.clone())?;
        grid_file::save_grid(&path, &f)?;
        eprintln!("wrote {path}");
    }

    let rho = Quantity::parse(&args.density)
        .with_context(|| format!("parse --density {}", args.density))?;
    let path = format!("{}_rho.tdg", args.out);
    let f = GridField::uniform([n, n, n], rho.value, rho.unit).with_spacing(dx)?;
    grid_file::save_grid(&path, &f)?;
    eprintln!("wrote {path}");
    Ok(())
}

fn phase(i: usize, n: usize) -> f64 {
    std::f64::consts::TAU * i as f64 / n as f64
}

/// Each component varies only along its own axis, so the field is a gradient.
fn irrotational(n: usize, a: f64) -> [Array3<f64>; 3] {
    [
        Array3::from_shape_fn((n, n, n), |(i, _, _)| a * phase(i, n).cos()),
        Array3::from_shape_fn((n, n, n), |(_, j, _)| a * phase(j, n).cos()),
        Array3::from_shape_fn((n, n, n), |(_, _, k)| a * (2.0 * phase(k, n)).cos()),
    ]
}

/// Each component is constant along its own axis, so the divergence vanishes.
fn solenoidal(n: usize, a: f64) -> [Array3<f64>; 3] {
    [
        Array3::from_shape_fn((n, n, n), |(_, j, _)| a * phase(j, n).sin()),
        Array3::from_shape_fn((n, n, n), |(_, _, k)| a * phase(k, n).sin()),
        Array3::from_shape_fn((n, n, n), |(i, _, _)| a * phase(i, n).sin()),
    ]
}
