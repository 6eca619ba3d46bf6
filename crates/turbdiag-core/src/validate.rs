// crates/turbdiag-core/src/validate.rs

use crate::config::SolverConfig;
use crate::error::{DiagError, Result};

pub fn validate_config(c: &SolverConfig) -> Result<()> {
    if c.max_iterations == 0 {
        return Err(DiagError::Config("max_iterations must be non-zero".into()));
    }
    if !(c.tolerance > 0.0) || !c.tolerance.is_finite() {
        return Err(DiagError::Config("tolerance must be a positive number".into()));
    }
    // relaxation > 1 over-relaxes Jacobi and diverges on the highest modes.
    if !(c.relaxation > 0.0 && c.relaxation <= 1.0) {
        return Err(DiagError::Config("relaxation must be in (0, 1]".into()));
    }
    if c.check_every == 0 {
        return Err(DiagError::Config("check_every must be non-zero".into()));
    }
    Ok(())
}

/// Cubes per side must be at least one.
pub fn validate_cubes_per_side(n: usize) -> Result<()> {
    if n == 0 {
        return Err(DiagError::InvalidArgument(
            "cubes_per_side must be at least 1".into(),
        ));
    }
    Ok(())
}
