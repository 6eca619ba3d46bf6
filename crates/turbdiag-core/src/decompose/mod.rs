// crates/turbdiag-core/src/decompose/mod.rs

pub mod result;

use std::borrow::Cow;

use ndarray::Array3;

use crate::config::SolverConfig;
use crate::engine::script::{self, COMPRESSIVE_OUTPUTS, SOLENOIDAL_OUTPUTS};
use crate::engine::{ColumnMajor, Engine, NativeEngine, Value};
use crate::error::{DiagError, Result};
use crate::field::{GridField, VectorField3D};
use crate::units::{Dimension, Quantity, Unit};
use crate::validate::validate_config;

pub use result::{ArithmeticFault, DecompositionResult, SolverReport};

/// Splits a velocity field into compressive and solenoidal parts by driving
/// an [`Engine`] session through a decomposition script.
///
/// The decomposer owns its engine; `decompose` takes `&mut self`, so one
/// session never serves two decompositions at once. Share a decomposer
/// between threads behind a `Mutex`.
pub struct FieldDecomposer<E: Engine = NativeEngine> {
    engine: E,
    script: Cow<'static, str>,
    tolerance: f64,
}

impl FieldDecomposer<NativeEngine> {
    pub fn native(config: &SolverConfig) -> Result<Self> {
        validate_config(config)?;
        Ok(Self {
            engine: NativeEngine::new(config.poisson()),
            script: Cow::Borrowed(config.weighting.script()),
            tolerance: config.tolerance,
        })
    }
}

impl<E: Engine> FieldDecomposer<E> {
    /// Drive a custom engine with a custom script. `tolerance` only decides
    /// the `converged` flag of the report.
    pub fn with_engine(engine: E, script: impl Into<Cow<'static, str>>, tolerance: f64) -> Self {
        Self {
            engine,
            script: script.into(),
            tolerance,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn decompose(
        &mut self,
        velocity: &VectorField3D,
        density: &GridField,
        dx: &Quantity,
    ) -> Result<DecompositionResult> {
        check_inputs(velocity, density, dx)?;
        let shape = velocity.shape();
        let _span = tracing::info_span!("decompose", ?shape).entered();

        // The session starts empty and keeps nothing once this call returns.
        self.engine.reset();
        let result = self.run_session(velocity, density, dx);
        self.engine.reset();
        result
    }

    fn run_session(
        &mut self,
        velocity: &VectorField3D,
        density: &GridField,
        dx: &Quantity,
    ) -> Result<DecompositionResult> {
        let shape = velocity.shape();

        self.push_inputs(velocity, density, dx)?;
        let faults = self.run_script()?;

        let mut compressive = Vec::with_capacity(3);
        let mut solenoidal = Vec::with_capacity(3);
        for (i, c) in velocity.components().into_iter().enumerate() {
            compressive.push(self.pull_output(COMPRESSIVE_OUTPUTS[i], shape, c.unit())?);
            solenoidal.push(self.pull_output(SOLENOIDAL_OUTPUTS[i], shape, c.unit())?);
        }
        let [cx, cy, cz]: [GridField; 3] = compressive
            .try_into()
            .map_err(|_| DiagError::ShapeMismatch("missing compressive component".into()))?;
        let [sx, sy, sz]: [GridField; 3] = solenoidal
            .try_into()
            .map_err(|_| DiagError::ShapeMismatch("missing solenoidal component".into()))?;

        let iterations = self
            .engine
            .get_variable(script::SYS_POISSON_ITERATIONS)
            .and_then(|v| v.as_i64())
            .ok()
            .map(|i| i.max(0) as u32);
        let residual = self
            .engine
            .get_variable(script::SYS_POISSON_RESIDUAL)
            .and_then(|v| v.as_f64())
            .ok();
        let converged = residual.is_some_and(|r| r <= self.tolerance);

        let report = SolverReport {
            iterations,
            residual,
            tolerance: self.tolerance,
            converged,
            faults,
        };
        if converged {
            tracing::info!(?iterations, ?residual, faults = report.faults.len(), "decomposition done");
        } else {
            tracing::warn!(?iterations, ?residual, tolerance = self.tolerance, "decomposition did not converge");
        }

        Ok(DecompositionResult::new(
            VectorField3D { x: cx, y: cy, z: cz },
            VectorField3D { x: sx, y: sy, z: sz },
            report,
        ))
    }

    fn push_inputs(
        &mut self,
        velocity: &VectorField3D,
        density: &GridField,
        dx: &Quantity,
    ) -> Result<()> {
        let [n1, n2, n3] = density.shape();
        let names = script::INPUT_VARIABLES;

        for (name, c) in names[..3].iter().zip(velocity.components()) {
            let engine_order = ColumnMajor::from_array(&c.cgs_values());
            self.engine.set_variable(name, Value::Array(engine_order))?;
        }
        self.engine
            .set_variable(names[3], Value::Array(ColumnMajor::from_array(&density.cgs_values())))?;

        for (name, n) in names[4..7].iter().zip([n1, n2, n3]) {
            self.engine.set_variable(name, Value::Int(n as i64))?;
        }
        let h = dx.cgs().value;
        for name in &names[7..10] {
            self.engine.set_variable(name, Value::Float(h))?;
        }
        Ok(())
    }

    /// Execute the script line by line. Arithmetic faults are recorded and
    /// skipped; any other engine error aborts.
    fn run_script(&mut self) -> Result<Vec<ArithmeticFault>> {
        let mut faults = Vec::new();
        for (line_no, line) in script::command_lines(&self.script) {
            tracing::debug!(line = line_no, command = line, "execute");
            match self.engine.execute(line) {
                Ok(()) => {}
                Err(e) if e.is_arithmetic() => {
                    tracing::warn!(line = line_no, command = line, error = %e, "arithmetic fault, continuing");
                    faults.push(ArithmeticFault {
                        line: line_no,
                        command: line.to_string(),
                        detail: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(faults)
    }

    fn pull_output(&self, name: &str, shape: [usize; 3], unit: &Unit) -> Result<GridField> {
        let raw = self.engine.get_variable(name)?.into_array()?;
        let cgs = transpose_correct(raw, shape)?;
        let back = 1.0 / unit.scale();
        Ok(GridField::new(cgs.mapv(|v| v * back), unit.clone()))
    }
}

fn check_inputs(velocity: &VectorField3D, density: &GridField, dx: &Quantity) -> Result<()> {
    velocity.validate()?;
    velocity.x.ensure_same_shape(density, "velocity vs density")?;
    if density.is_empty() {
        return Err(DiagError::InvalidArgument(format!(
            "cannot decompose an empty grid {:?}",
            density.shape()
        )));
    }
    if velocity.x.unit().dimension() != Dimension::VELOCITY {
        return Err(DiagError::Unit(format!(
            "velocity must be a velocity, got '{}'",
            velocity.x.unit()
        )));
    }
    if density.unit().dimension() != Dimension::DENSITY {
        return Err(DiagError::Unit(format!(
            "density must be a mass density, got '{}'",
            density.unit()
        )));
    }
    dx.expect_dimension(Dimension::LENGTH, "dx")?;
    if !(dx.value > 0.0) || !dx.value.is_finite() {
        return Err(DiagError::InvalidArgument(format!("dx must be positive, got {dx}")));
    }
    Ok(())
}

/// Engine arrays come back first-index-fastest; rebuild the caller's
/// (x1, x2, x3) indexing in standard layout.
fn transpose_correct(raw: ColumnMajor, shape: [usize; 3]) -> Result<Array3<f64>> {
    if raw.dims != shape {
        return Err(DiagError::ShapeMismatch(format!(
            "engine returned dims {:?}, expected {shape:?}",
            raw.dims
        )));
    }
    let [n1, n2, n3] = shape;
    let reversed = Array3::from_shape_vec((n3, n2, n1), raw.data)
        .map_err(|e| DiagError::ShapeMismatch(e.to_string()))?;
    Ok(reversed.reversed_axes().as_standard_layout().into_owned())
}
