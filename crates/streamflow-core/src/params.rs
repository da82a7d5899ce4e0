/// Catchment model parameters.
///
/// Nine fixed scalars in calling order:
/// - `i_max`: Maximum interception storage [mm]
/// - `s_umax`: Unsaturated storage capacity [mm]
/// - `q_smax`: Maximum percolation rate [mm/day]
/// - `alpha_e`: Evaporation flux shape parameter [-]
/// - `alpha_f`: Runoff flux shape parameter [-]
/// - `k_s`: Slow reservoir time constant [days]
/// - `k_f`: Fast reservoir time constant [days]
/// - `alpha_s`: Percolation flux shape parameter [-]
/// - `alpha_i`: Interception flux shape parameter [-]
use streamflow_macros::FieldVector;

use crate::constants::{ALPHA_I_DEFAULT, ALPHA_S_DEFAULT};
use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, FieldVector)]
pub struct Parameters {
    #[field_vector(name = "I_max")]
    pub i_max: f64,
    #[field_vector(name = "S_umax")]
    pub s_umax: f64,
    #[field_vector(name = "Q_smax")]
    pub q_smax: f64,
    pub alpha_e: f64,
    pub alpha_f: f64,
    #[field_vector(name = "K_s")]
    pub k_s: f64,
    #[field_vector(name = "K_f")]
    pub k_f: f64,
    pub alpha_s: f64,
    pub alpha_i: f64,
}

impl Parameters {
    /// Create new Parameters without validation.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        i_max: f64,
        s_umax: f64,
        q_smax: f64,
        alpha_e: f64,
        alpha_f: f64,
        k_s: f64,
        k_f: f64,
        alpha_s: f64,
        alpha_i: f64,
    ) -> Self {
        Self {
            i_max,
            s_umax,
            q_smax,
            alpha_e,
            alpha_f,
            k_s,
            k_f,
            alpha_s,
            alpha_i,
        }
    }

    /// Check the assumptions the ODE evaluator relies on.
    ///
    /// `I_max`, `S_umax`, `K_s` and `K_f` are divisors and must be strictly
    /// positive; every value must be finite. The evaluator itself never calls
    /// this.
    pub fn validate(&self) -> ModelResult<()> {
        for (&name, value) in Self::field_names().iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(ModelError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        let divisors = [
            ("I_max", self.i_max),
            ("S_umax", self.s_umax),
            ("K_s", self.k_s),
            ("K_f", self.k_f),
        ];
        for (name, value) in divisors {
            if value <= 0.0 {
                return Err(ModelError::InvalidParameter {
                    name,
                    value,
                    reason: "must be strictly positive",
                });
            }
        }
        Ok(())
    }
}

/// The seven parameters inferred by the river model.
///
/// The percolation and interception shape parameters are held fixed and
/// supplied separately through [`CalibratedParameters::with_shapes`].
#[derive(Debug, Clone, Copy, PartialEq, FieldVector)]
pub struct CalibratedParameters {
    #[field_vector(name = "I_max")]
    pub i_max: f64,
    #[field_vector(name = "S_umax")]
    pub s_umax: f64,
    #[field_vector(name = "Q_smax")]
    pub q_smax: f64,
    pub alpha_e: f64,
    pub alpha_f: f64,
    #[field_vector(name = "K_s")]
    pub k_s: f64,
    #[field_vector(name = "K_f")]
    pub k_f: f64,
}

impl CalibratedParameters {
    /// Full ODE parameter set with the given fixed shape parameters.
    pub fn with_shapes(&self, alpha_s: f64, alpha_i: f64) -> Parameters {
        Parameters::new(
            self.i_max,
            self.s_umax,
            self.q_smax,
            self.alpha_e,
            self.alpha_f,
            self.k_s,
            self.k_f,
            alpha_s,
            alpha_i,
        )
    }

    /// Full ODE parameter set with the default fixed shape parameters.
    pub fn with_default_shapes(&self) -> Parameters {
        self.with_shapes(ALPHA_S_DEFAULT, ALPHA_I_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{N_CALIBRATED, N_PARAMS, PARAM_NAMES};

    fn test_params() -> Parameters {
        Parameters::new(2.5, 100.0, 7.0, 1.0, -0.5, 60.0, 3.25, 0.0, 50.0)
    }

    #[test]
    fn field_names_match_calling_order() {
        assert_eq!(Parameters::LEN, N_PARAMS);
        assert_eq!(Parameters::field_names(), PARAM_NAMES);
        assert_eq!(CalibratedParameters::LEN, N_CALIBRATED);
        assert_eq!(CalibratedParameters::field_names(), &PARAM_NAMES[..N_CALIBRATED]);
    }

    #[test]
    fn from_slice_valid() {
        let p = Parameters::from_slice(&[2.5, 100.0, 7.0, 1.0, -0.5, 60.0, 3.25, 0.0, 50.0]).unwrap();
        assert_eq!(p, test_params());
    }

    #[test]
    fn from_slice_wrong_length() {
        assert!(Parameters::from_slice(&[2.5, 100.0]).is_err());
        assert!(CalibratedParameters::from_slice(&[0.0; 9]).is_err());
    }

    #[test]
    fn valid_parameters_pass_validation() {
        assert!(test_params().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_divisors() {
        let mut p = test_params();
        p.k_s = 0.0;
        assert!(matches!(
            p.validate(),
            Err(ModelError::InvalidParameter { name: "K_s", .. })
        ));

        let mut p = test_params();
        p.i_max = -1.0;
        assert!(matches!(
            p.validate(),
            Err(ModelError::InvalidParameter { name: "I_max", .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut p = test_params();
        p.alpha_f = f64::NAN;
        assert!(matches!(
            p.validate(),
            Err(ModelError::InvalidParameter { name: "alpha_f", .. })
        ));
    }

    #[test]
    fn negative_shape_parameters_are_valid() {
        let mut p = test_params();
        p.alpha_e = -20.0;
        p.alpha_i = -5.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn with_shapes_fills_fixed_parameters() {
        let c = CalibratedParameters::from_array([2.5, 100.0, 7.0, 1.0, -0.5, 60.0, 3.25]);
        assert_eq!(c.with_default_shapes(), test_params());
        let p = c.with_shapes(1.5, -2.0);
        assert_eq!(p.alpha_s, 1.5);
        assert_eq!(p.alpha_i, -2.0);
        assert_eq!(p.k_f, 3.25);
    }
}
