//! Domain errors for the classification engine. Only configuration and
//! input-shape problems surface to the caller; everything else is recovered
//! inside the pipeline as an absent score.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("classification requires at least {required} unique samples, got {got}")]
    InputTooShort { required: usize, got: usize },
    #[error("column length mismatch: {0}")]
    ColumnMismatch(&'static str),
    #[error("interval [{start}, {stop}] contains no samples")]
    EmptyInterval { start: f64, stop: f64 },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
