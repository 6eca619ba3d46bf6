use ndarray::Array3;
use turbdiag_core::config::Weighting;
use turbdiag_core::{FieldDecomposer, GridField, Quantity, SolverConfig, Unit, VectorField3D};

const N: usize = 16;
const A: f64 = 50.0;
const B: f64 = 30.0;

fn phase(i: usize) -> f64 {
    std::f64::consts::TAU * i as f64 / N as f64
}

fn kms() -> Unit {
    Unit::parse("km/s").unwrap()
}

/// Curl-free: each component varies only along its own axis.
fn irrotational() -> [Array3<f64>; 3] {
    [
        Array3::from_shape_fn((N, N, N), |(i, _, _)| A * phase(i).cos()),
        Array3::from_shape_fn((N, N, N), |(_, j, _)| A * phase(j).cos()),
        Array3::from_shape_fn((N, N, N), |(_, _, k)| A * (2.0 * phase(k)).cos()),
    ]
}

/// Divergence-free: each component is constant along its own axis.
fn solenoidal() -> [Array3<f64>; 3] {
    [
        Array3::from_shape_fn((N, N, N), |(_, j, _)| B * phase(j).sin()),
        Array3::from_shape_fn((N, N, N), |(_, _, k)| B * phase(k).sin()),
        Array3::from_shape_fn((N, N, N), |(i, _, _)| B * phase(i).sin()),
    ]
}

fn velocity(parts: [Array3<f64>; 3]) -> VectorField3D {
    let [x, y, z] = parts;
    VectorField3D::new(GridField::new(x, kms()), GridField::new(y, kms()), GridField::new(z, kms()))
        .unwrap()
}

fn density() -> GridField {
    GridField::uniform([N, N, N], 1e-26, Unit::parse("g/cm**3").unwrap())
}

fn dx() -> Quantity {
    Quantity::parse("0.5 kpc").unwrap()
}

fn max_abs_diff(a: &Array3<f64>, b: &Array3<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

fn max_abs(a: &GridField) -> f64 {
    a.values().iter().map(|v| v.abs()).fold(0.0, f64::max)
}

#[test]
fn irrotational_field_has_no_solenoidal_part() {
    let v = velocity(irrotational());
    let mut d = FieldDecomposer::native(&SolverConfig::default()).unwrap();
    let r = d.decompose(&v, &density(), &dx()).unwrap();

    for s in r.solenoidal().components() {
        assert!(max_abs(s) < 1e-6 * A, "solenoidal residue {}", max_abs(s));
    }
    for (c, orig) in r.compressive().components().into_iter().zip(v.components()) {
        assert!(max_abs_diff(c.values(), orig.values()) < 1e-6 * A);
    }
    let rep = r.report();
    assert!(rep.converged);
    assert!(rep.faults.is_empty());
    assert!(rep.iterations.unwrap() > 0);
    assert!(rep.residual.unwrap() <= rep.tolerance);
}

#[test]
fn divergence_free_field_has_no_compressive_part() {
    let v = velocity(solenoidal());
    let mut d = FieldDecomposer::native(&SolverConfig::default()).unwrap();
    let r = d.decompose(&v, &density(), &dx()).unwrap();

    for c in r.compressive().components() {
        assert!(max_abs(c) < 1e-9 * B);
    }
    assert!(max_abs_diff(r.velx_sole().values(), v.x.values()) < 1e-9 * B);
    assert!(max_abs_diff(r.vely_sole().values(), v.y.values()) < 1e-9 * B);
    assert!(max_abs_diff(r.velz_sole().values(), v.z.values()) < 1e-9 * B);
    assert!(r.report().is_clean());
}

#[test]
fn mixed_field_splits_into_its_parts() {
    let irr = irrotational();
    let sol = solenoidal();
    let mixed = [&irr[0] + &sol[0], &irr[1] + &sol[1], &irr[2] + &sol[2]];
    let v = velocity(mixed);

    let mut d = FieldDecomposer::native(&SolverConfig::default()).unwrap();
    let r = d.decompose(&v, &density(), &dx()).unwrap();

    let comp = r.compressive().components();
    let sole = r.solenoidal().components();
    for axis in 0..3 {
        assert!(max_abs_diff(comp[axis].values(), &irr[axis]) < 1e-6 * A, "axis {axis}");
        assert!(max_abs_diff(sole[axis].values(), &sol[axis]) < 1e-6 * A, "axis {axis}");
    }
}

#[test]
fn outputs_keep_each_component_unit() {
    let [x, y, z] = irrotational();
    let ms = Unit::parse("m/s").unwrap();
    let v = VectorField3D::new(
        GridField::new(x, kms()),
        GridField::new(y.mapv(|v| v * 1e3), ms.clone()),
        GridField::new(z, kms()),
    )
    .unwrap();

    let mut d = FieldDecomposer::native(&SolverConfig::default()).unwrap();
    let r = d.decompose(&v, &density(), &dx()).unwrap();

    assert_eq!(r.velx_comp().unit(), &kms());
    assert_eq!(r.vely_comp().unit(), &ms);
    assert_eq!(r.vely_sole().unit(), &ms);
    assert_eq!(r.velz_sole().shape(), [N, N, N]);
    // y was given in m/s, so it comes back in m/s
    assert!(max_abs_diff(r.vely_comp().values(), v.y.values()) < 1e-6 * A * 1e3);
}

#[test]
fn sqrt_density_weighting_matches_plain_for_uniform_density() {
    let v = velocity(irrotational());
    let plain_cfg = SolverConfig::default();
    let weighted_cfg = SolverConfig {
        weighting: Weighting::SqrtDensity,
        ..SolverConfig::default()
    };

    let plain = FieldDecomposer::native(&plain_cfg)
        .unwrap()
        .decompose(&v, &density(), &dx())
        .unwrap();
    let weighted = FieldDecomposer::native(&weighted_cfg)
        .unwrap()
        .decompose(&v, &density(), &dx())
        .unwrap();

    for (a, b) in plain
        .compressive()
        .components()
        .into_iter()
        .zip(weighted.compressive().components())
    {
        assert!(max_abs_diff(a.values(), b.values()) < 1e-6 * A);
    }
}

#[test]
fn zero_density_cell_is_reported_not_fatal() {
    let v = velocity(irrotational());
    let mut rho = density().into_values();
    rho[[3, 4, 5]] = 0.0;
    let rho = GridField::new(rho, Unit::parse("g/cm**3").unwrap());

    let cfg = SolverConfig {
        weighting: Weighting::SqrtDensity,
        ..SolverConfig::default()
    };
    let mut d = FieldDecomposer::native(&cfg).unwrap();
    let r = d.decompose(&v, &rho, &dx()).unwrap();

    let faults = &r.report().faults;
    assert!(!faults.is_empty());
    assert!(faults.iter().any(|f| f.command.starts_with("vx1c = divide")));
    assert!(!r.report().is_clean());
    assert_eq!(r.velx_comp().shape(), [N, N, N]);
}

#[test]
fn decomposer_session_is_reusable() {
    let mut d = FieldDecomposer::native(&SolverConfig::default()).unwrap();
    let a = d.decompose(&velocity(solenoidal()), &density(), &dx()).unwrap();
    let b = d.decompose(&velocity(solenoidal()), &density(), &dx()).unwrap();
    assert_eq!(a.velx_sole().values(), b.velx_sole().values());
}
