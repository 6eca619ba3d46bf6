// crates/turbdiag-core/src/config/mod.rs

pub mod defaults;

use std::path::Path;

use serde::Deserialize;

use crate::engine::script;
use crate::engine::stencil::{PoissonMethod, PoissonParams};
use crate::error::{DiagError, Result};
use crate::validate::validate_config;

/// Which quantity the Helmholtz split is applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Decompose the velocity itself.
    #[default]
    None,
    /// Decompose sqrt(rho) * v and map the parts back to velocity.
    SqrtDensity,
}

impl Weighting {
    pub fn script(self) -> &'static str {
        match self {
            Weighting::None => script::DECOMPOSE_VELOCITY,
            Weighting::SqrtDensity => script::DECOMPOSE_VELOCITY_WEIGHTED,
        }
    }
}

/// Solver settings for the decomposition. Every field is optional in TOML;
/// missing keys take the values from [`defaults`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub method: PoissonMethod,
    pub max_iterations: u32,
    pub tolerance: f64,
    pub relaxation: f64,
    pub check_every: u32,
    pub weighting: Weighting,
}

impl Default for SolverConfig {
    fn default() -> Self {
        defaults::default_solver_config()
    }
}

impl SolverConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: SolverConfig =
            toml::from_str(s).map_err(|e| DiagError::Config(e.to_string()))?;
        validate_config(&cfg)?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| DiagError::Config(format!("{}: {e}", path.display())))
    }

    pub fn poisson(&self) -> PoissonParams {
        PoissonParams {
            method: self.method,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            relaxation: self.relaxation,
            check_every: self.check_every,
        }
    }
}
