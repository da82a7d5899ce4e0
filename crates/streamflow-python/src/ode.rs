use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::convert::fixed_arity;

use streamflow_core::constants::{N_PARAMS, PARAM_NAMES, STATE_SIZE};
use streamflow_core::flux::flux as core_flux;
use streamflow_core::forcing::Forcing;
use streamflow_core::ode;
use streamflow_core::params::Parameters;
use streamflow_core::state::State;

define_value_class! {
    /// Instantaneous compartment fluxes for one state [mm/day].
    pub struct StepFluxes from streamflow_core::ode::Fluxes {
        intercept_evap, effect_precip, unsat_evap, percolation,
        runoff, slow_stream, fast_stream,
    }
}

/// Flux function for hydrological processes.
///
/// Relative flux as it depends on relative storage `s` (saturated to
/// [0, 1]) and a single shape parameter `a`.
#[pyfunction]
fn flux(s: f64, a: f64) -> f64 {
    core_flux(s, a)
}

/// Evaluate the differential equations.
///
/// Returns the derivatives of [S_i, S_u, S_s, S_f, z] as a list of floats,
/// in double precision.
#[pyfunction]
#[allow(clippy::too_many_arguments, non_snake_case)]
#[pyo3(signature = (
    t, S_i, S_u, S_s, S_f, precip, evap,
    I_max, S_umax, Q_smax, alpha_e, alpha_f, K_s, K_f, alpha_s, alpha_i,
))]
fn ode_rhs(
    t: f64,
    S_i: f64,
    S_u: f64,
    S_s: f64,
    S_f: f64,
    precip: f64,
    evap: f64,
    I_max: f64,
    S_umax: f64,
    Q_smax: f64,
    alpha_e: f64,
    alpha_f: f64,
    K_s: f64,
    K_f: f64,
    alpha_s: f64,
    alpha_i: f64,
) -> Vec<f64> {
    let state = State {
        interception: S_i,
        unsaturated: S_u,
        slow: S_s,
        fast: S_f,
        discharge: 0.0,
    };
    let params = Parameters::new(
        I_max, S_umax, Q_smax, alpha_e, alpha_f, K_s, K_f, alpha_s, alpha_i,
    );
    ode::ode_rhs(t, &state, &Forcing::new(precip, evap), &params)
        .to_array()
        .to_vec()
}

/// Vectorised right-hand side for solver callbacks.
///
/// `y` holds the 5-element state [S_i, S_u, S_s, S_f, z] and `params` the 9
/// ODE parameters in calling order. Returns a 5-element numpy array.
#[pyfunction]
fn rhs<'py>(
    py: Python<'py>,
    t: f64,
    y: PyReadonlyArray1<'py, f64>,
    precip: f64,
    evap: f64,
    params: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let state = fixed_arity(&y, "y", State::from_slice)?;
    let params = fixed_arity(&params, "params", Parameters::from_slice)?;
    let d = ode::ode_rhs(t, &state, &Forcing::new(precip, evap), &params);
    Ok(PyArray1::from_slice(py, &d.to_array()))
}

/// Compartment fluxes for one state, for diagnostics.
#[pyfunction]
fn fluxes<'py>(
    y: PyReadonlyArray1<'py, f64>,
    precip: f64,
    evap: f64,
    params: PyReadonlyArray1<'py, f64>,
) -> PyResult<StepFluxes> {
    let state = fixed_arity(&y, "y", State::from_slice)?;
    let params = fixed_arity(&params, "params", Parameters::from_slice)?;
    let f = ode::fluxes(&state, &Forcing::new(precip, evap), &params);
    Ok(StepFluxes::from_core(&f))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "ode")?;
    m.add_function(wrap_pyfunction!(flux, &m)?)?;
    m.add_function(wrap_pyfunction!(ode_rhs, &m)?)?;
    m.add_function(wrap_pyfunction!(rhs, &m)?)?;
    m.add_function(wrap_pyfunction!(fluxes, &m)?)?;
    m.add_class::<StepFluxes>()?;
    m.add("PARAM_NAMES", PARAM_NAMES.to_vec())?;
    m.add("N_PARAMS", N_PARAMS)?;
    m.add("STATE_NAMES", State::field_names().to_vec())?;
    m.add("STATE_SIZE", STATE_SIZE)?;
    parent.add_submodule(&m)?;
    Ok(())
}
