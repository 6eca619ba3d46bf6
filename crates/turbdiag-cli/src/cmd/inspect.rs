// crates/turbdiag-cli/src/cmd/inspect.rs

use clap::Args;
use turbdiag_core::format::grid::grid_id_hex;

use crate::io::grid_file;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input .tdg path (.tdg.zst is inflated first)
    #[arg(long)]
    pub r#in: String,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let f = grid_file::load_grid(&args.r#in)?;
    let s = f.summary();
    let [n1, n2, n3] = f.shape();

    println!("--- inspect ---");
    println!("file        = {}", args.r#in);
    println!("grid_ok     = true (magic + crc32 + blake3 verified)");
    println!("grid_id     = {}", grid_id_hex(&f)?);
    println!("shape       = {n1} x {n2} x {n3}");
    println!("unit        = {}", f.unit());
    println!("dimension   = {}", f.unit().dimension());
    match f.spacing() {
        Some(dx) => println!("dx          = {dx}"),
        None => println!("dx          = (none)"),
    }
    println!("min         = {}", s.min);
    println!("max         = {}", s.max);
    println!("mean        = {}", s.mean);
    println!("non_finite  = {}", s.non_finite);
    Ok(())
}
