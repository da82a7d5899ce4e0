//! ODE integrators for the catchment model.
//!
//! - [`Method::DormandPrince`]: embedded 5(4) Runge–Kutta pair with adaptive
//!   step-size control. The accurate default.
//! - [`Method::Rk4`]: classical fixed-step RK4. Cheap, with accuracy governed
//!   only by the number of substeps.
//!
//! Both integrate any [`OdeSystem`] over a single interval and return the
//! state at the end of it.
use tracing::trace;

use crate::error::{ModelError, ModelResult};
use crate::traits::OdeSystem;

/// Integration method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Adaptive Dormand–Prince 5(4).
    DormandPrince,
    /// Fixed-step RK4 with `substeps` equal steps per interval.
    Rk4 { substeps: usize },
}

/// Configuration for the integrators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub method: Method,
    /// Relative tolerance (default: 1e-6). Adaptive method only.
    pub rtol: f64,
    /// Absolute tolerance (default: 1e-8). Adaptive method only.
    pub atol: f64,
    /// Initial step size. Set to 0.0 to derive it from the interval.
    pub h0: f64,
    /// Minimum step size before giving up (default: 1e-12).
    pub h_min: f64,
    /// Maximum number of attempted steps per interval (default: 100_000).
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: Method::DormandPrince,
            rtol: 1e-6,
            atol: 1e-8,
            h0: 0.0,
            h_min: 1e-12,
            max_steps: 100_000,
        }
    }
}

impl SolverOptions {
    /// Adaptive options with the given tolerances.
    pub fn adaptive(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }

    /// Fixed-step RK4 options.
    pub fn fixed(substeps: usize) -> Self {
        Self {
            method: Method::Rk4 { substeps },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        let invalid = |what: &str| ModelError::InvalidOptions {
            what: what.to_string(),
        };
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(invalid("rtol must be finite and > 0"));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(invalid("atol must be finite and > 0"));
        }
        if !self.h0.is_finite() || self.h0 < 0.0 {
            return Err(invalid("h0 must be finite and >= 0"));
        }
        if !self.h_min.is_finite() || self.h_min <= 0.0 {
            return Err(invalid("h_min must be finite and > 0"));
        }
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be > 0"));
        }
        if let Method::Rk4 { substeps: 0 } = self.method {
            return Err(invalid("substeps must be > 0"));
        }
        Ok(())
    }
}

/// Integrate `sys` from `t0` to `t1` starting at `y0`, returning `y(t1)`.
pub fn integrate<S: OdeSystem>(
    sys: &S,
    y0: &[f64],
    t0: f64,
    t1: f64,
    opts: &SolverOptions,
) -> ModelResult<Vec<f64>> {
    opts.validate()?;
    let n = sys.ndim();
    if y0.len() != n {
        return Err(ModelError::DimensionMismatch {
            expected: n,
            got: y0.len(),
        });
    }
    if !t0.is_finite() || !t1.is_finite() || t1 < t0 {
        return Err(ModelError::InvalidOptions {
            what: format!("integration interval [{t0}, {t1}] must be finite and ordered"),
        });
    }
    if t1 == t0 {
        return Ok(y0.to_vec());
    }

    match opts.method {
        Method::DormandPrince => dormand_prince(sys, y0, t0, t1, opts),
        Method::Rk4 { substeps } => rk4(sys, y0, t0, t1, substeps),
    }
}

// Dormand–Prince tableau.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];
const A: [[f64; 6]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0, 0.0],
    [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
];
// 5th-order weights equal the last row of A (FSAL).
const B5: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];
const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

fn dormand_prince<S: OdeSystem>(
    sys: &S,
    y0: &[f64],
    t0: f64,
    t1: f64,
    opts: &SolverOptions,
) -> ModelResult<Vec<f64>> {
    let n = y0.len();
    let span = t1 - t0;

    let mut t = t0;
    let mut y = y0.to_vec();
    let mut h = if opts.h0 > 0.0 {
        opts.h0.min(span)
    } else {
        (span * 1e-2).max(opts.h_min)
    };

    let mut k = vec![vec![0.0; n]; 7];
    let mut y_tmp = vec![0.0; n];
    let mut y_new = vec![0.0; n];

    sys.rhs(t, &y, &mut k[0]);

    for _ in 0..opts.max_steps {
        h = h.min(t1 - t);

        for s in 1..7 {
            for i in 0..n {
                let incr: f64 = (0..s).map(|j| A[s][j] * k[j][i]).sum();
                y_tmp[i] = y[i] + h * incr;
            }
            sys.rhs(t + C[s] * h, &y_tmp, &mut k[s]);
        }
        // Stage 7 was evaluated at the 5th-order solution.
        y_new.copy_from_slice(&y_tmp);

        let mut err_norm = 0.0;
        for i in 0..n {
            let ei: f64 = h * (0..7).map(|j| (B5[j] - B4[j]) * k[j][i]).sum::<f64>();
            let sc = opts.atol + opts.rtol * y[i].abs().max(y_new[i].abs());
            err_norm += (ei / sc) * (ei / sc);
        }
        let err_norm = (err_norm / n as f64).sqrt();

        if err_norm.is_finite() && err_norm <= 1.0 {
            t += h;
            y.copy_from_slice(&y_new);
            if y.iter().any(|v| !v.is_finite()) {
                return Err(ModelError::NonFinite { t });
            }
            k.swap(0, 6);
            if t1 - t <= opts.h_min {
                return Ok(y);
            }
        } else {
            trace!(t, h, err_norm, "rejected step");
            if h <= opts.h_min {
                return Err(ModelError::StepSizeUnderflow { t, h });
            }
        }

        let factor = if err_norm == 0.0 {
            MAX_FACTOR
        } else if err_norm.is_finite() {
            (SAFETY * err_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
        } else {
            MIN_FACTOR
        };
        h = (h * factor).max(opts.h_min);
    }

    Err(ModelError::MaxStepsExceeded {
        max_steps: opts.max_steps,
        t_end: t1,
    })
}

fn rk4<S: OdeSystem>(
    sys: &S,
    y0: &[f64],
    t0: f64,
    t1: f64,
    substeps: usize,
) -> ModelResult<Vec<f64>> {
    let n = y0.len();
    let h = (t1 - t0) / substeps as f64;

    let mut y = y0.to_vec();
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut y_tmp = vec![0.0; n];

    for step in 0..substeps {
        let t = t0 + step as f64 * h;

        sys.rhs(t, &y, &mut k1);
        for i in 0..n {
            y_tmp[i] = y[i] + 0.5 * h * k1[i];
        }
        sys.rhs(t + 0.5 * h, &y_tmp, &mut k2);
        for i in 0..n {
            y_tmp[i] = y[i] + 0.5 * h * k2[i];
        }
        sys.rhs(t + 0.5 * h, &y_tmp, &mut k3);
        for i in 0..n {
            y_tmp[i] = y[i] + h * k3[i];
        }
        sys.rhs(t + h, &y_tmp, &mut k4);

        for i in 0..n {
            y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite { t: t + h });
        }
    }

    Ok(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// dy/dt = -k y, y(t) = y0 exp(-k t).
    struct Decay {
        k: f64,
    }

    impl OdeSystem for Decay {
        fn ndim(&self) -> usize {
            1
        }

        fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
            dydt[0] = -self.k * y[0];
        }
    }

    /// Harmonic oscillator, y = (cos t, -sin t).
    struct Oscillator;

    impl OdeSystem for Oscillator {
        fn ndim(&self) -> usize {
            2
        }

        fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
            dydt[0] = y[1];
            dydt[1] = -y[0];
        }
    }

    /// Right-hand side that is never finite.
    struct Poisoned;

    impl OdeSystem for Poisoned {
        fn ndim(&self) -> usize {
            1
        }

        fn rhs(&self, _t: f64, _y: &[f64], dydt: &mut [f64]) {
            dydt[0] = f64::NAN;
        }
    }

    #[test]
    fn default_options_are_valid() {
        assert!(SolverOptions::default().validate().is_ok());
        assert!(SolverOptions::fixed(10).validate().is_ok());
    }

    #[test]
    fn rejects_invalid_options() {
        assert!(SolverOptions::adaptive(0.0, 1e-8).validate().is_err());
        assert!(SolverOptions::adaptive(1e-6, f64::NAN).validate().is_err());
        assert!(SolverOptions::fixed(0).validate().is_err());
        let opts = SolverOptions {
            max_steps: 0,
            ..SolverOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(ModelError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn dormand_prince_exponential_decay() {
        let y = integrate(&Decay { k: 0.7 }, &[2.0], 0.0, 3.0, &SolverOptions::default()).unwrap();
        assert_relative_eq!(y[0], 2.0 * (-2.1f64).exp(), max_relative = 1e-5);
    }

    #[test]
    fn dormand_prince_oscillator() {
        let opts = SolverOptions::adaptive(1e-9, 1e-12);
        let y = integrate(&Oscillator, &[1.0, 0.0], 0.0, 10.0, &opts).unwrap();
        assert_relative_eq!(y[0], 10.0f64.cos(), epsilon = 1e-6);
        assert_relative_eq!(y[1], -10.0f64.sin(), epsilon = 1e-6);
    }

    #[test]
    fn rk4_exponential_decay() {
        let y = integrate(&Decay { k: 0.7 }, &[2.0], 0.0, 3.0, &SolverOptions::fixed(100)).unwrap();
        assert_relative_eq!(y[0], 2.0 * (-2.1f64).exp(), max_relative = 1e-7);
    }

    #[test]
    fn empty_interval_returns_initial_state() {
        let y = integrate(&Decay { k: 1.0 }, &[3.0], 1.0, 1.0, &SolverOptions::default()).unwrap();
        assert_eq!(y, vec![3.0]);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let err = integrate(&Oscillator, &[1.0], 0.0, 1.0, &SolverOptions::default()).unwrap_err();
        assert_eq!(err, ModelError::DimensionMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn rejects_reversed_interval() {
        let err = integrate(&Decay { k: 1.0 }, &[1.0], 1.0, 0.0, &SolverOptions::default());
        assert!(matches!(err, Err(ModelError::InvalidOptions { .. })));
    }

    #[test]
    fn adaptive_reports_step_size_underflow() {
        let err = integrate(&Poisoned, &[1.0], 0.0, 1.0, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, ModelError::StepSizeUnderflow { .. }));
    }

    #[test]
    fn fixed_step_reports_non_finite_state() {
        let err = integrate(&Poisoned, &[1.0], 0.0, 1.0, &SolverOptions::fixed(4)).unwrap_err();
        assert!(matches!(err, ModelError::NonFinite { .. }));
    }

    #[test]
    fn max_steps_is_enforced() {
        let opts = SolverOptions {
            max_steps: 3,
            ..SolverOptions::adaptive(1e-12, 1e-14)
        };
        let err = integrate(&Oscillator, &[1.0, 0.0], 0.0, 100.0, &opts).unwrap_err();
        assert!(matches!(err, ModelError::MaxStepsExceeded { max_steps: 3, .. }));
    }
}
