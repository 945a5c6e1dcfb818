//! Top-level error type for `clr_core`
use crate::interpreter::InterpretError;
use crate::timeline::TimelineError;
use crate::utils::date::DateError;
use thiserror::Error;

/// Top-level error type for `clr_core`
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),
    #[error("Interpreter error: {0}")]
    Interpret(#[from] InterpretError),
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}
