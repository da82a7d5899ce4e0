//! Catchment model numerical constants and model contract.
//!
//! Centralises all fixed values used by the flux function, the ODE
//! evaluator and the river model driver.

// -- Numerical safeguards --

/// Shape parameters with `|a|` at or below this use the linear limit `f(s) = s`.
pub const LINEAR_LIMIT: f64 = 1e-5;

/// Cap applied to the exponent argument of the flux curve to prevent overflow.
pub const MAX_EXP_ARG: f64 = 600.0;

// -- Model contract constants --

/// Number of elements in the state (and derivative) vector.
pub const STATE_SIZE: usize = 5;

/// Number of ODE parameters, in calling order.
pub const N_PARAMS: usize = 9;

/// ODE parameter names in calling order.
pub const PARAM_NAMES: &[&str] = &[
    "I_max", "S_umax", "Q_smax", "alpha_e", "alpha_f", "K_s", "K_f", "alpha_s", "alpha_i",
];

/// Number of parameters inferred by the river model (shape parameters
/// `alpha_s` and `alpha_i` are held fixed).
pub const N_CALIBRATED: usize = 7;

// -- River model defaults --

/// Percolation shape parameter used when not calibrated.
pub const ALPHA_S_DEFAULT: f64 = 0.0;

/// Interception shape parameter used when not calibrated.
pub const ALPHA_I_DEFAULT: f64 = 50.0;

/// Length of one forcing timestep [days].
pub const FORCING_STEP: f64 = 1.0;
