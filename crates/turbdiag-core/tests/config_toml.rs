use turbdiag_core::config::defaults::{
    DEFAULT_CHECK_EVERY, DEFAULT_MAX_ITERATIONS, DEFAULT_RELAXATION, DEFAULT_TOLERANCE,
};
use turbdiag_core::config::Weighting;
use turbdiag_core::engine::stencil::PoissonMethod;
use turbdiag_core::{DiagError, FieldDecomposer, SolverConfig};

#[test]
fn empty_toml_gives_defaults() {
    let c = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(c, SolverConfig::default());
    assert_eq!(c.max_iterations, DEFAULT_MAX_ITERATIONS);
    assert_eq!(c.tolerance, DEFAULT_TOLERANCE);
    assert_eq!(c.relaxation, DEFAULT_RELAXATION);
    assert_eq!(c.check_every, DEFAULT_CHECK_EVERY);
    assert_eq!(c.weighting, Weighting::None);
    assert_eq!(c.method, PoissonMethod::ConjugateGradient);
}

#[test]
fn partial_toml_overrides_only_named_keys() {
    let c = SolverConfig::from_toml_str("max_iterations = 500\nweighting = \"sqrt_density\"\n").unwrap();
    assert_eq!(c.max_iterations, 500);
    assert_eq!(c.weighting, Weighting::SqrtDensity);
    assert_eq!(c.tolerance, DEFAULT_TOLERANCE);

    let p = c.poisson();
    assert_eq!(p.max_iterations, 500);
    assert_eq!(p.relaxation, DEFAULT_RELAXATION);
}

#[test]
fn method_selects_the_poisson_solver() {
    let c = SolverConfig::from_toml_str("method = \"jacobi\"\n").unwrap();
    assert_eq!(c.poisson().method, PoissonMethod::Jacobi);
    assert!(matches!(
        SolverConfig::from_toml_str("method = \"multigrid\"").unwrap_err(),
        DiagError::Config(_)
    ));
}

#[test]
fn out_of_range_values_are_rejected() {
    for bad in [
        "max_iterations = 0",
        "tolerance = 0.0",
        "tolerance = -1e-6",
        "relaxation = 1.5",
        "relaxation = 0.0",
        "check_every = 0",
    ] {
        let err = SolverConfig::from_toml_str(bad).unwrap_err();
        assert!(matches!(err, DiagError::Config(_)), "{bad}: {err}");
    }
}

#[test]
fn unknown_keys_and_bad_weighting_are_rejected() {
    assert!(matches!(
        SolverConfig::from_toml_str("tolerence = 1e-8").unwrap_err(),
        DiagError::Config(_)
    ));
    assert!(matches!(
        SolverConfig::from_toml_str("weighting = \"mass\"").unwrap_err(),
        DiagError::Config(_)
    ));
}

#[test]
fn load_reads_a_file_and_names_it_in_errors() {
    let dir = std::env::temp_dir().join(format!("turbdiag-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.toml");
    std::fs::write(&good, "relaxation = 1.0\ncheck_every = 5\n").unwrap();
    let c = SolverConfig::load(&good).unwrap();
    assert_eq!(c.relaxation, 1.0);
    assert_eq!(c.check_every, 5);

    let bad = dir.join("bad.toml");
    std::fs::write(&bad, "check_every = 0\n").unwrap();
    let msg = SolverConfig::load(&bad).unwrap_err().to_string();
    assert!(msg.contains("bad.toml"), "{msg}");

    let missing = SolverConfig::load(dir.join("missing.toml")).unwrap_err();
    assert!(matches!(missing, DiagError::Io(_)));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn native_decomposer_validates_config() {
    let mut c = SolverConfig::default();
    c.relaxation = 2.0;
    assert!(matches!(FieldDecomposer::native(&c), Err(DiagError::Config(_))));
}
