//! Error types for the river model driver and integrators.
//!
//! The flux function and the ODE evaluator never fail; they saturate instead.
//! Everything here belongs to the boundary around them.
use thiserror::Error;

/// Errors that can occur while validating inputs or integrating the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid forcing data: {what}")]
    InvalidForcing { what: String },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("data are not available for time {time}")]
    DataUnavailable { time: f64 },

    #[error("invalid solver options: {what}")]
    InvalidOptions { what: String },

    #[error("dimension mismatch: expected {expected} state elements, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("step size underflow at t = {t} (h = {h:e})")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("exceeded {max_steps} steps before reaching t = {t_end}")]
    MaxStepsExceeded { max_steps: usize, t_end: f64 },

    #[error("non-finite state encountered at t = {t}")]
    NonFinite { t: f64 },
}

pub type ModelResult<T> = Result<T, ModelError>;
