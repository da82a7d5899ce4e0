use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use streamflow_core::ModelError;

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<&'py [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Build a fixed-arity core value from a numpy array, naming the argument
/// in the error.
pub fn fixed_arity<'py, T>(
    arr: &'py PyReadonlyArray1<'py, f64>,
    name: &str,
    from_slice: fn(&[f64]) -> Result<T, String>,
) -> PyResult<T> {
    let slice = contiguous_slice(arr)?;
    from_slice(slice).map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

/// Map core errors onto Python exceptions.
///
/// Missing forcing data is a simulation failure (`RuntimeError`); everything
/// else is a usage error (`ValueError`).
pub fn model_err(e: ModelError) -> PyErr {
    match e {
        ModelError::DataUnavailable { .. } => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}
