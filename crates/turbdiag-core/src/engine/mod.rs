// crates/turbdiag-core/src/engine/mod.rs
//
// Variable/command boundary to a numerical engine. Callers push named inputs,
// run a script line by line and pull named outputs back.

pub mod native;
pub mod script;
pub mod stencil;
pub mod value;

use thiserror::Error;

pub use native::NativeEngine;
pub use value::{ColumnMajor, Value};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("type mismatch: {0}")]
    Type(String),

    /// Non-finite result of an otherwise valid command. The target variable
    /// still holds the computed values.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}

impl EngineError {
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, EngineError::Arithmetic(_))
    }
}

pub trait Engine {
    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), EngineError>;

    fn get_variable(&self, name: &str) -> Result<Value, EngineError>;

    fn execute(&mut self, line: &str) -> Result<(), EngineError>;

    /// Drop every variable, including solver diagnostics.
    fn reset(&mut self);
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), EngineError> {
        (**self).set_variable(name, value)
    }

    fn get_variable(&self, name: &str) -> Result<Value, EngineError> {
        (**self).get_variable(name)
    }

    fn execute(&mut self, line: &str) -> Result<(), EngineError> {
        (**self).execute(line)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), EngineError> {
        (**self).set_variable(name, value)
    }

    fn get_variable(&self, name: &str) -> Result<Value, EngineError> {
        (**self).get_variable(name)
    }

    fn execute(&mut self, line: &str) -> Result<(), EngineError> {
        (**self).execute(line)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
