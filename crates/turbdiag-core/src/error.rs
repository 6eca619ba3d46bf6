// crates/turbdiag-core/src/error.rs

use thiserror::Error;

use crate::engine::EngineError;

pub type Result<T> = std::result::Result<T, DiagError>;

#[derive(Debug, Error)]
pub enum DiagError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("non-cubic grid {0:?}: cube aggregation needs equal extent on all axes")]
    NonCubicGrid([usize; 3]),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unit error: {0}")]
    Unit(String),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("config error: {0}")]
    Config(String),

    #[error("grid format error: {0}")]
    GridFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
