//! Catchment ODE evaluator.
//!
//! Composes the flux function into the five mass-balance equations:
//!
//! ```text
//! dS_i/dt = P - E_i - P_e
//! dS_u/dt = P_e - E_u - Q_perc - Q_r
//! dS_s/dt = Q_perc - S_s / K_s
//! dS_f/dt = Q_r - S_f / K_f
//! dz/dt   = S_s / K_s + S_f / K_f
//! ```
//!
//! All functions here are pure: no allocation, no I/O, no shared state.
use crate::constants::STATE_SIZE;
use crate::flux::flux;
use crate::forcing::Forcing;
use crate::params::Parameters;
use crate::state::{Derivatives, State};
use crate::traits::OdeSystem;

/// Instantaneous fluxes between compartments [mm/day].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fluxes {
    /// Evaporation drawn from interception storage.
    pub intercept_evap: f64,
    /// Through-fall passing into the unsaturated zone.
    pub effect_precip: f64,
    /// Remaining evaporative demand drawn from unsaturated storage.
    pub unsat_evap: f64,
    /// Percolation from unsaturated storage to the slow reservoir.
    pub percolation: f64,
    /// Through-fall routed to the fast reservoir.
    pub runoff: f64,
    /// Slow reservoir discharge.
    pub slow_stream: f64,
    /// Fast reservoir discharge.
    pub fast_stream: f64,
}

impl Fluxes {
    /// Total streamflow leaving both reservoirs.
    pub fn streamflow(&self) -> f64 {
        self.slow_stream + self.fast_stream
    }
}

/// Compute the compartment fluxes for one state.
///
/// Storages outside their physical range are tolerated: relative storages
/// are saturated inside [`flux`], so transient integrator overshoot never
/// raises.
#[inline]
pub fn fluxes(state: &State, forcing: &Forcing, params: &Parameters) -> Fluxes {
    let Forcing { precip, evap } = *forcing;

    // Interception
    let rel_interception = state.interception / params.i_max;
    let intercept_evap = evap * flux(rel_interception, params.alpha_i);
    let effect_precip = precip * flux(rel_interception, -params.alpha_i);

    // Unsaturated storage
    let rel_unsaturated = state.unsaturated / params.s_umax;
    let unsat_evap = (evap - intercept_evap).max(0.0) * flux(rel_unsaturated, params.alpha_e);

    // Percolation and runoff
    let percolation = params.q_smax * flux(rel_unsaturated, params.alpha_s);
    let runoff = effect_precip * flux(rel_unsaturated, params.alpha_f);

    // Linear reservoirs
    let slow_stream = state.slow / params.k_s;
    let fast_stream = state.fast / params.k_f;

    Fluxes {
        intercept_evap,
        effect_precip,
        unsat_evap,
        percolation,
        runoff,
        slow_stream,
        fast_stream,
    }
}

impl From<(&Forcing, &Fluxes)> for Derivatives {
    fn from((forcing, f): (&Forcing, &Fluxes)) -> Self {
        Self {
            interception: forcing.precip - f.intercept_evap - f.effect_precip,
            unsaturated: f.effect_precip - f.unsat_evap - f.percolation - f.runoff,
            slow: f.percolation - f.slow_stream,
            fast: f.runoff - f.fast_stream,
            discharge: f.slow_stream + f.fast_stream,
        }
    }
}

/// Evaluate the catchment ODE right-hand side.
///
/// `_t` is accepted for integrator callback compatibility; the model is
/// autonomous. Assumes `I_max`, `S_umax`, `K_s` and `K_f` are strictly
/// positive; see [`Parameters::validate`].
#[inline]
pub fn ode_rhs(_t: f64, state: &State, forcing: &Forcing, params: &Parameters) -> Derivatives {
    let f = fluxes(state, forcing, params);
    Derivatives::from((forcing, &f))
}

/// The catchment ODE with forcing held constant, as an [`OdeSystem`].
///
/// Operates on flat `[S_i, S_u, S_s, S_f, z]` slices.
///
/// # Panics
///
/// `rhs` panics if `y` or `dydt` does not have exactly 5 elements.
#[derive(Debug, Clone, Copy)]
pub struct CatchmentOde {
    pub forcing: Forcing,
    pub params: Parameters,
}

impl CatchmentOde {
    pub fn new(forcing: Forcing, params: Parameters) -> Self {
        Self { forcing, params }
    }
}

impl OdeSystem for CatchmentOde {
    fn ndim(&self) -> usize {
        STATE_SIZE
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        assert_eq!(y.len(), STATE_SIZE, "state length mismatch");
        assert_eq!(dydt.len(), STATE_SIZE, "derivative length mismatch");
        let state = State {
            interception: y[0],
            unsaturated: y[1],
            slow: y[2],
            fast: y[3],
            discharge: y[4],
        };
        let d = ode_rhs(t, &state, &self.forcing, &self.params);
        dydt.copy_from_slice(&d.to_array());
    }
}
