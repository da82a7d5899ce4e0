use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::model_err;

use streamflow_core::constants::{ALPHA_I_DEFAULT, ALPHA_S_DEFAULT};
use streamflow_core::forcing::ForcingSeries;
use streamflow_core::model::RiverModel;
use streamflow_core::params::CalibratedParameters;
use streamflow_core::solver::SolverOptions;

/// Rainfall-runoff river model over daily forcing data.
///
/// `solver` is `"rk45"` (adaptive Dormand–Prince, controlled by `rtol` and
/// `atol`) or `"rk4"` (fixed-step, `substeps` steps per day).
#[pyclass(name = "RiverModel", frozen)]
pub struct PyRiverModel {
    inner: RiverModel,
}

fn solver_options(solver: &str, rtol: f64, atol: f64, substeps: usize) -> PyResult<SolverOptions> {
    match solver {
        "rk45" | "dopri" => Ok(SolverOptions::adaptive(rtol, atol)),
        "rk4" => Ok(SolverOptions::fixed(substeps)),
        other => Err(PyValueError::new_err(format!(
            "unknown solver {other:?}, expected \"rk45\" or \"rk4\""
        ))),
    }
}

fn calibrated(params: &[f64]) -> PyResult<CalibratedParameters> {
    CalibratedParameters::from_slice(params).map_err(|e| PyValueError::new_err(format!("parameters: {e}")))
}

#[pymethods]
impl PyRiverModel {
    #[new]
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (
        times,
        precip,
        evap,
        solver="rk45",
        rtol=1e-6,
        atol=1e-8,
        substeps=24,
        alpha_s=ALPHA_S_DEFAULT,
        alpha_i=ALPHA_I_DEFAULT,
    ))]
    fn new(
        times: Vec<f64>,
        precip: Vec<f64>,
        evap: Vec<f64>,
        solver: &str,
        rtol: f64,
        atol: f64,
        substeps: usize,
        alpha_s: f64,
        alpha_i: f64,
    ) -> PyResult<Self> {
        let forcing = ForcingSeries::new(times, precip, evap).map_err(model_err)?;
        let options = solver_options(solver, rtol, atol, substeps)?;
        let inner = RiverModel::new(forcing, options)
            .map_err(model_err)?
            .with_shapes(alpha_s, alpha_i);
        Ok(Self { inner })
    }

    /// Number of parameters taken by `simulate`.
    fn n_parameters(&self) -> usize {
        self.inner.n_parameters()
    }

    #[getter]
    fn model_data_times(&self) -> Vec<f64> {
        self.inner.forcing().times().to_vec()
    }

    #[getter]
    fn rainfall_data(&self) -> Vec<f64> {
        self.inner.forcing().precip().to_vec()
    }

    #[getter]
    fn evap_data(&self) -> Vec<f64> {
        self.inner.forcing().evap().to_vec()
    }

    /// Precipitation keyed by forcing time.
    #[getter]
    fn rainfall_data_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for (t, f) in self.inner.forcing().iter() {
            dict.set_item(t, f.precip)?;
        }
        Ok(dict)
    }

    /// Evaporation keyed by forcing time.
    #[getter]
    fn evap_data_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for (t, f) in self.inner.forcing().iter() {
            dict.set_item(t, f.evap)?;
        }
        Ok(dict)
    }

    /// Simulated daily discharge at each requested time.
    ///
    /// `parameters` is [I_max, S_umax, Q_smax, alpha_e, alpha_f, K_s, K_f].
    fn simulate<'py>(
        &self,
        py: Python<'py>,
        parameters: Vec<f64>,
        times: Vec<f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let p = calibrated(&parameters)?;
        let q = py
            .allow_threads(|| self.inner.simulate(&p, &times))
            .map_err(model_err)?;
        Ok(PyArray1::from_vec(py, q))
    }

    /// Simulate several parameter draws in parallel.
    ///
    /// Raises on the first failing draw.
    fn simulate_many<'py>(
        &self,
        py: Python<'py>,
        draws: Vec<Vec<f64>>,
        times: Vec<f64>,
    ) -> PyResult<Vec<Bound<'py, PyArray1<f64>>>> {
        let draws = draws
            .iter()
            .map(|d| calibrated(d))
            .collect::<PyResult<Vec<_>>>()?;
        let results = py.allow_threads(|| self.inner.simulate_many(&draws, &times));
        results
            .into_iter()
            .map(|r| r.map(|q| PyArray1::from_vec(py, q)).map_err(model_err))
            .collect()
    }
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "model")?;
    m.add_class::<PyRiverModel>()?;
    parent.add_submodule(&m)?;
    Ok(())
}
