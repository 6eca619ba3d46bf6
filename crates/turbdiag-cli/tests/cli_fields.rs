use std::path::Path;
use std::process::{Command, Output};

use ndarray::Array3;
use turbdiag_core::format::grid::{decode, encode};
use turbdiag_core::{GridField, Unit};

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_turbdiag-cli"))
}

fn run_ok(cmd: &mut Command) -> Output {
    let out = cmd.output().expect("spawn command");
    assert!(
        out.status.success(),
        "command failed: status={:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

fn run_err(cmd: &mut Command) -> String {
    let out = cmd.output().expect("spawn command");
    assert!(!out.status.success(), "command unexpectedly succeeded");
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn p(dir: &Path, name: &str) -> String {
    dir.join(name).to_str().unwrap().to_string()
}

fn synth_uniform(path: &str, n: usize, value: f64, unit: &str) {
    run_ok(cli().args([
        "synth",
        "--kind",
        "uniform",
        "--n",
        &n.to_string(),
        &format!("--value={value}"),
        "--unit",
        unit,
        "--out",
        path,
    ]));
}

/// Pull a numeric field out of one JSONL line.
fn json_num(line: &str, key: &str) -> f64 {
    let tag = format!("\"{key}\":");
    let start = line.find(&tag).unwrap_or_else(|| panic!("{key} missing in {line}")) + tag.len();
    let rest = &line[start..];
    let end = rest.find([',', '}']).unwrap();
    rest[..end].parse().unwrap()
}

#[test]
fn uniform_field_rms_is_its_magnitude() {
    let dir = tempfile::tempdir().unwrap();
    let f = p(dir.path(), "u.tdg");
    synth_uniform(&f, 8, -2.5, "km/s");

    let out = run_ok(cli().args(["rms-cubes", "--in", &f, "--cubes", "2"]));
    let text = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("{\"i\":0,\"j\":0,\"k\":0,"));
    assert!(lines[7].starts_with("{\"i\":1,\"j\":1,\"k\":1,"));
    for l in &lines {
        assert_eq!(json_num(l, "rms"), 2.5);
        assert!(l.contains("\"unit\":\"km s**-1\""), "{l}");
    }
}

#[test]
fn rms_cubes_converts_units_and_writes_nulls_for_empty_cubes() {
    let dir = tempfile::tempdir().unwrap();
    let f = p(dir.path(), "u.tdg");
    let out = p(dir.path(), "rms.jsonl");
    synth_uniform(&f, 4, 3.0, "km/s");

    run_ok(cli().args(["rms-cubes", "--in", &f, "--cubes", "1", "--unit", "m/s", "--out", &out]));
    let text = std::fs::read_to_string(&out).unwrap();
    let line = text.lines().next().unwrap();
    assert!((json_num(line, "rms") - 3000.0).abs() < 1e-9);

    let o = run_ok(cli().args(["rms-cubes", "--in", &f, "--cubes", "5"]));
    let text = String::from_utf8(o.stdout).unwrap();
    assert_eq!(text.lines().count(), 125);
    assert!(text.lines().all(|l| l.contains("\"rms\":null")));
}

#[test]
fn rms_cubes_rejects_non_cubic_grids() {
    let dir = tempfile::tempdir().unwrap();
    let f = p(dir.path(), "flat.tdg");
    let field = GridField::uniform([4, 4, 2], 1.0, Unit::parse("cm/s").unwrap());
    std::fs::write(&f, encode(&field).unwrap()).unwrap();

    let err = run_err(cli().args(["rms-cubes", "--in", &f, "--cubes", "2"]));
    assert!(err.contains("non-cubic"), "{err}");
}

#[test]
fn zst_files_round_trip_and_inspect_reports_header() {
    let dir = tempfile::tempdir().unwrap();
    let f = p(dir.path(), "u.tdg.zst");
    synth_uniform(&f, 6, 4.0, "g/cm**3");

    // compressed on disk
    let raw = std::fs::read(&f).unwrap();
    assert!(decode(&raw).is_err());

    let out = run_ok(cli().args(["inspect", "--in", &f]));
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("shape       = 6 x 6 x 6"), "{text}");
    assert!(text.contains("unit        = g cm**-3"), "{text}");
    assert!(text.contains("mean        = 4"), "{text}");
    assert!(text.contains("dx          = 1 pc"), "{text}");
}

#[test]
fn corrupted_grid_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let f = p(dir.path(), "u.tdg");
    synth_uniform(&f, 4, 1.0, "km/s");
    let mut b = std::fs::read(&f).unwrap();
    let mid = b.len() / 2;
    b[mid] ^= 0xFF;
    std::fs::write(&f, b).unwrap();

    let err = run_err(cli().args(["inspect", "--in", &f]));
    assert!(err.contains("crc32"), "{err}");
}

#[test]
fn sigma_of_uniform_perturbations() {
    let dir = tempfile::tempdir().unwrap();
    let drho = p(dir.path(), "drho.tdg");
    let rho = p(dir.path(), "rho.tdg");
    let dv = p(dir.path(), "dv.tdg");
    let cs = p(dir.path(), "cs.tdg");
    synth_uniform(&drho, 4, 0.2, "g/cm**3");
    synth_uniform(&rho, 4, 1.0, "g/cm**3");
    synth_uniform(&dv, 4, 1.0, "km/s");
    synth_uniform(&cs, 4, 400000.0, "cm/s");

    let out = run_ok(cli().args([
        "sigma", "--delta-rho", &drho, "--rho", &rho, "--delta-v", &dv, "--sound-speed", &cs,
        "--cubes", "2",
    ]));
    let text = String::from_utf8(out.stdout).unwrap();
    assert_eq!(text.lines().count(), 8);
    for l in text.lines() {
        assert!((json_num(l, "sigma_rho") - 0.2).abs() < 1e-12, "{l}");
        assert!((json_num(l, "sigma_v") - 0.25).abs() < 1e-12, "{l}");
    }

    let err = run_err(cli().args([
        "sigma", "--delta-rho", &dv, "--rho", &rho, "--delta-v", &dv, "--sound-speed", &cs,
        "--cubes", "2",
    ]));
    assert!(err.contains("different dimensions"), "{err}");
}

#[test]
fn synth_writes_consistent_vector_files() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = p(dir.path(), "mix");
    run_ok(cli().args(["synth", "--kind", "mixed", "--n", "6", "--out", &prefix, "--dx", "2 pc"]));

    let mut shapes = Vec::new();
    for c in ["vx", "vy", "vz", "rho"] {
        let f = decode(&std::fs::read(format!("{prefix}_{c}.tdg")).unwrap()).unwrap();
        assert_eq!(f.spacing().unwrap().value, 2.0);
        shapes.push(f.shape());
    }
    assert!(shapes.iter().all(|s| *s == [6, 6, 6]));

    let vx = decode(&std::fs::read(format!("{prefix}_vx.tdg")).unwrap()).unwrap();
    let expect = Array3::from_shape_fn((6, 6, 6), |(i, j, _)| {
        let t = std::f64::consts::TAU / 6.0;
        10.0 * (t * i as f64).cos() + 6.0 * (t * j as f64).sin()
    });
    let diff = vx
        .values()
        .iter()
        .zip(expect.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(diff < 1e-12);
}
