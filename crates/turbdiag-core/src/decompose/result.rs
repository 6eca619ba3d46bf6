// crates/turbdiag-core/src/decompose/result.rs

use crate::field::{GridField, VectorField3D};

/// A script line whose result contained non-finite values.
#[derive(Clone, Debug, PartialEq)]
pub struct ArithmeticFault {
    /// 1-based line number inside the script.
    pub line: usize,
    pub command: String,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverReport {
    /// Relaxation sweeps used by the Poisson solve, if the engine reports it.
    pub iterations: Option<u32>,
    /// Final relative residual of the Poisson solve, if the engine reports it.
    pub residual: Option<f64>,
    pub tolerance: f64,
    /// `residual <= tolerance`; false when the engine reports no residual.
    pub converged: bool,
    pub faults: Vec<ArithmeticFault>,
}

impl SolverReport {
    pub fn is_clean(&self) -> bool {
        self.converged && self.faults.is_empty()
    }
}

/// Compressive and solenoidal parts of a velocity field, in the units of the
/// input components.
#[derive(Clone, Debug)]
pub struct DecompositionResult {
    compressive: VectorField3D,
    solenoidal: VectorField3D,
    report: SolverReport,
}

impl DecompositionResult {
    pub(crate) fn new(
        compressive: VectorField3D,
        solenoidal: VectorField3D,
        report: SolverReport,
    ) -> Self {
        Self {
            compressive,
            solenoidal,
            report,
        }
    }

    pub fn compressive(&self) -> &VectorField3D {
        &self.compressive
    }

    pub fn solenoidal(&self) -> &VectorField3D {
        &self.solenoidal
    }

    pub fn report(&self) -> &SolverReport {
        &self.report
    }

    pub fn velx_comp(&self) -> &GridField {
        &self.compressive.x
    }

    pub fn vely_comp(&self) -> &GridField {
        &self.compressive.y
    }

    pub fn velz_comp(&self) -> &GridField {
        &self.compressive.z
    }

    pub fn velx_sole(&self) -> &GridField {
        &self.solenoidal.x
    }

    pub fn vely_sole(&self) -> &GridField {
        &self.solenoidal.y
    }

    pub fn velz_sole(&self) -> &GridField {
        &self.solenoidal.z
    }

    pub fn into_parts(self) -> (VectorField3D, VectorField3D, SolverReport) {
        (self.compressive, self.solenoidal, self.report)
    }
}
