// crates/turbdiag-cli/src/io/jsonl.rs

use anyhow::Context;
use turbdiag_core::dispersion::DispersionStats;
use turbdiag_core::RmsSequence;

/// JSON has no NaN; empty cubes are written as null.
fn num(v: f64) -> String {
    if v.is_finite() {
        format!("{v:e}")
    } else {
        "null".to_string()
    }
}

fn esc(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn cube_index(flat: usize, n: usize) -> (usize, usize, usize) {
    (flat / (n * n), (flat / n) % n, flat % n)
}

/// One line per cube: {"i":I,"j":J,"k":K,"rms":X,"unit":"U"}
pub fn rms_lines(seq: &RmsSequence) -> String {
    let n = seq.cubes_per_side();
    let unit = esc(&seq.unit().symbol());
    let mut s = String::new();
    for (flat, &v) in seq.values().iter().enumerate() {
        let (i, j, k) = cube_index(flat, n);
        s.push_str(&format!(
            "{{\"i\":{i},\"j\":{j},\"k\":{k},\"rms\":{},\"unit\":\"{unit}\"}}\n",
            num(v)
        ));
    }
    s
}

/// One line per cube: {"i":I,"j":J,"k":K,"sigma_rho":X,"sigma_v":Y}
pub fn sigma_lines(stats: &DispersionStats) -> String {
    let n = stats.sigma_rho.cubes_per_side();
    let mut s = String::new();
    for (flat, (&r, &v)) in stats
        .sigma_rho
        .values()
        .iter()
        .zip(stats.sigma_v.values())
        .enumerate()
    {
        let (i, j, k) = cube_index(flat, n);
        s.push_str(&format!(
            "{{\"i\":{i},\"j\":{j},\"k\":{k},\"sigma_rho\":{},\"sigma_v\":{}}}\n",
            num(r),
            num(v)
        ));
    }
    s
}

/// Write to `path`, or stdout when none is given.
pub fn emit(out: Option<&str>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => std::fs::write(path, text).with_context(|| format!("write jsonl: {path}"))?,
        None => print!("{text}"),
    }
    Ok(())
}
