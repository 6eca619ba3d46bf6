use std::path::Path;
use std::process::{Command, Output};

use turbdiag_core::format::grid::decode;
use turbdiag_core::GridField;

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

fn load(path: &str) -> GridField {
    decode(&std::fs::read(path).unwrap()).unwrap()
}

fn max_abs(f: &GridField) -> f64 {
    f.values().iter().map(|v| v.abs()).fold(0.0, f64::max)
}

fn synth(dir: &Path, kind: &str) -> String {
    let prefix = dir.join(kind).to_str().unwrap().to_string();
    run_ok(cli().args([
        "synth", "--kind", kind, "--n", "8", "--amplitude", "20", "--dx", "0.5 kpc", "--out",
        &prefix,
    ]));
    prefix
}

fn decompose(prefix: &str, out: &str, extra: &[&str]) -> Command {
    let mut c = cli();
    c.args([
        "decompose",
        "--vx",
        &format!("{prefix}_vx.tdg"),
        "--vy",
        &format!("{prefix}_vy.tdg"),
        "--vz",
        &format!("{prefix}_vz.tdg"),
        "--rho",
        &format!("{prefix}_rho.tdg"),
        "--out-prefix",
        out,
    ]);
    c.args(extra);
    c
}

#[test]
fn irrotational_input_has_no_solenoidal_output() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = synth(dir.path(), "irrotational");
    let out = dir.path().join("irr_out").to_str().unwrap().to_string();

    let o = run_ok(&mut decompose(&prefix, &out, &["--strict"]));
    let report = String::from_utf8(o.stdout).unwrap();
    assert!(report.contains("converged   = true"), "{report}");
    assert!(report.contains("faults      = 0"), "{report}");

    for c in ["vx", "vy", "vz"] {
        let sole = load(&format!("{out}_{c}_sole.tdg"));
        assert!(max_abs(&sole) < 1e-6 * 20.0, "{c}: {}", max_abs(&sole));
        assert_eq!(sole.unit().symbol(), "km s**-1");
        assert_eq!(sole.spacing().unwrap().value, 0.5);

        let comp = load(&format!("{out}_{c}_comp.tdg"));
        let orig = load(&format!("{prefix}_{c}.tdg"));
        let diff = comp
            .values()
            .iter()
            .zip(orig.values().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(diff < 1e-6 * 20.0, "{c}: {diff}");
    }
}

#[test]
fn solenoidal_input_has_no_compressive_output_with_weighting() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = synth(dir.path(), "solenoidal");
    let out = dir.path().join("sol_out").to_str().unwrap().to_string();
    let cfg = dir.path().join("solver.toml");
    std::fs::write(&cfg, "weighting = \"sqrt_density\"\ntolerance = 1e-9\n").unwrap();

    let o = run_ok(&mut decompose(&prefix, &out, &["--config", cfg.to_str().unwrap()]));
    let report = String::from_utf8(o.stdout).unwrap();
    assert!(report.contains("weighting   = SqrtDensity"), "{report}");

    for c in ["vx", "vy", "vz"] {
        let comp = load(&format!("{out}_{c}_comp.tdg"));
        assert!(max_abs(&comp) < 1e-6 * 20.0, "{c}: {}", max_abs(&comp));
    }
}

#[test]
fn bad_config_and_mismatched_shapes_fail() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = synth(dir.path(), "mixed");
    let out = dir.path().join("bad_out").to_str().unwrap().to_string();

    let cfg = dir.path().join("bad.toml");
    std::fs::write(&cfg, "relaxation = 3.0\n").unwrap();
    let o = decompose(&prefix, &out, &["--config", cfg.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!o.status.success());
    assert!(String::from_utf8_lossy(&o.stderr).contains("relaxation"));

    let small = dir.path().join("small").to_str().unwrap().to_string();
    run_ok(cli().args(["synth", "--kind", "uniform", "--n", "4", "--unit", "g/cm**3", "--out", &format!("{small}.tdg")]));
    let o = cli()
        .args([
            "decompose",
            "--vx",
            &format!("{prefix}_vx.tdg"),
            "--vy",
            &format!("{prefix}_vy.tdg"),
            "--vz",
            &format!("{prefix}_vz.tdg"),
            "--rho",
            &format!("{small}.tdg"),
            "--out-prefix",
            &out,
        ])
        .output()
        .unwrap();
    assert!(!o.status.success());
    assert!(String::from_utf8_lossy(&o.stderr).contains("shape mismatch"));
    assert!(!Path::new(&format!("{out}_vx_comp.tdg")).exists());
}
