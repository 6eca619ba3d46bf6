// crates/turbdiag-core/src/engine/native.rs

use std::collections::HashMap;

use ndarray::{Array3, ShapeBuilder, Zip};

use crate::engine::script::{self, Arg, Statement};
use crate::engine::stencil::{self, PoissonParams};
use crate::engine::value::{ColumnMajor, Value};
use crate::engine::{Engine, EngineError};

#[derive(Clone, Debug)]
enum Var {
    Int(i64),
    Float(f64),
    Field(Array3<f64>),
}

/// In-process engine session. Holds its own variable namespace; nothing is
/// shared between sessions.
#[derive(Clone, Debug)]
pub struct NativeEngine {
    vars: HashMap<String, Var>,
    poisson: PoissonParams,
    executed: u64,
}

impl NativeEngine {
    pub fn new(poisson: PoissonParams) -> Self {
        Self {
            vars: HashMap::new(),
            poisson,
            executed: 0,
        }
    }

    /// Number of commands executed since creation or the last `reset`.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Number of variables currently held by the session.
    pub fn variable_count(&self) -> usize {
        self.vars.len()
    }

    fn var(&self, name: &str) -> Result<&Var, EngineError> {
        self.vars
            .get(name)
            .ok_or_else(|| EngineError::UnknownVariable(name.to_string()))
    }

    fn field_arg(&self, a: &Arg) -> Result<&Array3<f64>, EngineError> {
        match a {
            Arg::Var(name) => match self.var(name)? {
                Var::Field(f) => Ok(f),
                _ => Err(EngineError::Type(format!("'{name}' is not an array"))),
            },
            Arg::Number(n) => Err(EngineError::Type(format!("expected array, got literal {n}"))),
        }
    }

    fn scalar_arg(&self, a: &Arg) -> Result<f64, EngineError> {
        match a {
            Arg::Number(n) => Ok(*n),
            Arg::Var(name) => match self.var(name)? {
                Var::Int(i) => Ok(*i as f64),
                Var::Float(f) => Ok(*f),
                Var::Field(_) => Err(EngineError::Type(format!("'{name}' is not a scalar"))),
            },
        }
    }

    fn spacing(&self, args: &[Arg]) -> Result<[f64; 3], EngineError> {
        let h = [
            self.scalar_arg(&args[0])?,
            self.scalar_arg(&args[1])?,
            self.scalar_arg(&args[2])?,
        ];
        if h.iter().any(|d| !(*d > 0.0) || !d.is_finite()) {
            return Err(EngineError::Type(format!("grid spacing must be positive, got {h:?}")));
        }
        Ok(h)
    }

    fn binary(&self, args: &[Arg], f: impl Fn(f64, f64) -> f64) -> Result<Array3<f64>, EngineError> {
        let a = self.field_arg(&args[0])?;
        let b = self.field_arg(&args[1])?;
        if a.dim() != b.dim() {
            return Err(EngineError::Type(format!(
                "operand dims differ: {:?} vs {:?}",
                a.dim(),
                b.dim()
            )));
        }
        Ok(Zip::from(a).and(b).map_collect(|&x, &y| f(x, y)))
    }

    fn run(&mut self, st: &Statement) -> Result<Option<Var>, EngineError> {
        let arity = |n: usize| -> Result<(), EngineError> {
            if st.args.len() != n {
                return Err(EngineError::Syntax(format!(
                    "{} takes {n} arguments, got {}",
                    st.op,
                    st.args.len()
                )));
            }
            Ok(())
        };

        let out = match st.op.as_str() {
            "assert_dims" => {
                arity(4)?;
                let (d1, d2, d3) = self.field_arg(&st.args[0])?.dim();
                let want = [
                    self.scalar_arg(&st.args[1])?,
                    self.scalar_arg(&st.args[2])?,
                    self.scalar_arg(&st.args[3])?,
                ];
                if [d1 as f64, d2 as f64, d3 as f64] != want {
                    return Err(EngineError::Type(format!(
                        "dims ({d1}, {d2}, {d3}) do not match {want:?}"
                    )));
                }
                None
            }
            "copy" => {
                arity(1)?;
                Some(Var::Field(self.field_arg(&st.args[0])?.clone()))
            }
            "add" => {
                arity(2)?;
                Some(Var::Field(self.binary(&st.args, |a, b| a + b)?))
            }
            "sub" => {
                arity(2)?;
                Some(Var::Field(self.binary(&st.args, |a, b| a - b)?))
            }
            "mul" => {
                arity(2)?;
                Some(Var::Field(self.binary(&st.args, |a, b| a * b)?))
            }
            "divide" => {
                arity(2)?;
                Some(Var::Field(self.binary(&st.args, |a, b| a / b)?))
            }
            "sqrt" => {
                arity(1)?;
                Some(Var::Field(self.field_arg(&st.args[0])?.mapv(f64::sqrt)))
            }
            "deriv" => {
                arity(3)?;
                let a = self.field_arg(&st.args[0])?;
                let axis = self.scalar_arg(&st.args[1])?;
                let h = self.scalar_arg(&st.args[2])?;
                if !(axis == 1.0 || axis == 2.0 || axis == 3.0) {
                    return Err(EngineError::Type(format!("axis must be 1, 2 or 3, got {axis}")));
                }
                if !(h > 0.0) || !h.is_finite() {
                    return Err(EngineError::Type(format!("grid spacing must be positive, got {h}")));
                }
                Some(Var::Field(stencil::central_diff(a, axis as usize - 1, h)))
            }
            "divergence" => {
                arity(6)?;
                let v = [
                    self.field_arg(&st.args[0])?,
                    self.field_arg(&st.args[1])?,
                    self.field_arg(&st.args[2])?,
                ];
                if v[0].dim() != v[1].dim() || v[0].dim() != v[2].dim() {
                    return Err(EngineError::Type("divergence components differ in dims".into()));
                }
                let h = self.spacing(&st.args[3..])?;
                Some(Var::Field(stencil::divergence(v, h)))
            }
            "poisson" => {
                arity(4)?;
                let rhs = self.field_arg(&st.args[0])?;
                let h = self.spacing(&st.args[1..])?;
                let outcome = stencil::solve_poisson(rhs, h, &self.poisson);
                tracing::debug!(
                    iterations = outcome.iterations,
                    residual = outcome.residual,
                    "poisson relaxation finished"
                );
                self.vars.insert(
                    script::SYS_POISSON_ITERATIONS.to_string(),
                    Var::Int(outcome.iterations as i64),
                );
                self.vars.insert(
                    script::SYS_POISSON_RESIDUAL.to_string(),
                    Var::Float(outcome.residual),
                );
                if !outcome.residual.is_finite() {
                    if let Some(t) = &st.target {
                        self.vars.insert(t.clone(), Var::Field(outcome.phi));
                    }
                    return Err(EngineError::Arithmetic(format!(
                        "poisson residual is {} after {} iterations",
                        outcome.residual, outcome.iterations
                    )));
                }
                Some(Var::Field(outcome.phi))
            }
            other => return Err(EngineError::UnknownCommand(other.to_string())),
        };
        Ok(out)
    }
}

impl Engine for NativeEngine {
    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), EngineError> {
        let var = match value {
            Value::Int(i) => Var::Int(i),
            Value::Float(f) => Var::Float(f),
            Value::Array(ColumnMajor { dims, data }) => {
                let a = Array3::from_shape_vec((dims[0], dims[1], dims[2]).f(), data)
                    .map_err(|e| EngineError::Type(e.to_string()))?;
                Var::Field(a)
            }
        };
        self.vars.insert(name.to_string(), var);
        Ok(())
    }

    fn get_variable(&self, name: &str) -> Result<Value, EngineError> {
        Ok(match self.var(name)? {
            Var::Int(i) => Value::Int(*i),
            Var::Float(f) => Value::Float(*f),
            Var::Field(a) => Value::Array(ColumnMajor::from_array(a)),
        })
    }

    fn execute(&mut self, line: &str) -> Result<(), EngineError> {
        let Some(st) = script::parse_line(line)? else {
            return Ok(());
        };
        self.executed += 1;

        let result = self.run(&st)?;
        let (Some(target), Some(var)) = (st.target.as_ref(), result) else {
            return Ok(());
        };

        let bad = match &var {
            Var::Field(a) => a.iter().filter(|v| !v.is_finite()).count(),
            Var::Float(f) if !f.is_finite() => 1,
            _ => 0,
        };
        self.vars.insert(target.clone(), var);
        if bad > 0 {
            return Err(EngineError::Arithmetic(format!(
                "{bad} non-finite value(s) assigned to '{target}' by {}()",
                st.op
            )));
        }
        Ok(())
    }

    /// Drop every variable, keeping solver parameters.
    fn reset(&mut self) {
        self.vars.clear();
        self.executed = 0;
    }
}
