// crates/turbdiag-core/src/config/defaults.rs

use crate::config::{SolverConfig, Weighting};
use crate::engine::stencil::PoissonMethod;

pub const DEFAULT_METHOD: PoissonMethod = PoissonMethod::ConjugateGradient;
pub const DEFAULT_MAX_ITERATIONS: u32 = 20_000;
pub const DEFAULT_TOLERANCE: f64 = 1e-10;
// Undamped Jacobi does not contract the (pi/2h, pi/2h, pi/2h) mode of the
// wide-stencil Laplacian.
pub const DEFAULT_RELAXATION: f64 = 0.85;
pub const DEFAULT_CHECK_EVERY: u32 = 10;

pub fn default_solver_config() -> SolverConfig {
    SolverConfig {
        method: DEFAULT_METHOD,
        max_iterations: DEFAULT_MAX_ITERATIONS,
        tolerance: DEFAULT_TOLERANCE,
        relaxation: DEFAULT_RELAXATION,
        check_every: DEFAULT_CHECK_EVERY,
        weighting: Weighting::None,
    }
}
