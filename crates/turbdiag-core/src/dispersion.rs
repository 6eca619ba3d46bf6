// crates/turbdiag-core/src/dispersion.rs
//
// Per-cube dispersion of density and velocity perturbations, normalised by
// the local density and sound speed.

use crate::cubes::{compute_rms_in_cubes, RmsSequence};
use crate::error::{DiagError, Result};
use crate::field::GridField;

#[derive(Clone, Debug, PartialEq)]
pub struct DispersionStats {
    /// rms(delta_rho / rho) per cube.
    pub sigma_rho: RmsSequence,
    /// rms(delta_v / c_s) per cube.
    pub sigma_v: RmsSequence,
}

pub fn sigma_rho_sigma_v(
    delta_rho: &GridField,
    rho: &GridField,
    delta_v: &GridField,
    sound_speed: &GridField,
    cubes_per_side: usize,
) -> Result<DispersionStats> {
    let rho_ratio = normalised(delta_rho, rho, "delta_rho / rho")?;
    let v_ratio = normalised(delta_v, sound_speed, "delta_v / c_s")?;

    let sigma_rho = compute_rms_in_cubes(&rho_ratio, cubes_per_side)?;
    let sigma_v = compute_rms_in_cubes(&v_ratio, cubes_per_side)?;
    tracing::info!(
        cubes = sigma_rho.len(),
        mean_sigma_rho = sigma_rho.nan_mean(),
        mean_sigma_v = sigma_v.nan_mean(),
        "dispersion computed"
    );
    Ok(DispersionStats { sigma_rho, sigma_v })
}

fn normalised(num: &GridField, denom: &GridField, what: &str) -> Result<GridField> {
    if num.unit().dimension() != denom.unit().dimension() {
        return Err(DiagError::Unit(format!(
            "{what}: '{}' and '{}' have different dimensions",
            num.unit(),
            denom.unit()
        )));
    }
    num.ratio(denom)
}
