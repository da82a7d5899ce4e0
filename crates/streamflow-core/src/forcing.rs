use crate::constants::FORCING_STEP;
use crate::error::{ModelError, ModelResult};

/// Forcing inputs for one timestep [mm/day].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Forcing {
    pub precip: f64,
    pub evap: f64,
}

impl Forcing {
    pub fn new(precip: f64, evap: f64) -> Self {
        Self { precip, evap }
    }
}

/// Validated daily forcing series for the river model.
///
/// All arrays must have the same length, NaN values are rejected, and the
/// times must be finite and spaced exactly one day apart.
#[derive(Debug, Clone)]
pub struct ForcingSeries {
    times: Vec<f64>,
    precip: Vec<f64>,
    evap: Vec<f64>,
}

impl ForcingSeries {
    /// Create a new ForcingSeries with validation.
    pub fn new(times: Vec<f64>, precip: Vec<f64>, evap: Vec<f64>) -> ModelResult<Self> {
        let invalid = |what: String| ModelError::InvalidForcing { what };

        if times.is_empty() {
            return Err(invalid("times array is empty".to_string()));
        }
        if precip.len() != times.len() || evap.len() != times.len() {
            return Err(invalid(format!(
                "times length {} does not match precip length {} and evap length {}",
                times.len(),
                precip.len(),
                evap.len()
            )));
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(invalid(format!("times[{i}] is not finite")));
        }
        if let Some(i) = precip.iter().position(|v| v.is_nan()) {
            return Err(invalid(format!("precip array contains NaN at index {i}")));
        }
        if let Some(i) = evap.iter().position(|v| v.is_nan()) {
            return Err(invalid(format!("evap array contains NaN at index {i}")));
        }
        if let Some(i) = times
            .windows(2)
            .position(|w| (w[1] - w[0] - FORCING_STEP).abs() > 1e-9)
        {
            return Err(invalid(format!(
                "times must be consecutive days, found {} followed by {}",
                times[i],
                times[i + 1]
            )));
        }
        Ok(Self {
            times,
            precip,
            evap,
        })
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if there are no timesteps.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First forcing day.
    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn precip(&self) -> &[f64] {
        &self.precip
    }

    pub fn evap(&self) -> &[f64] {
        &self.evap
    }

    /// `(time, forcing)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Forcing)> + '_ {
        self.times
            .iter()
            .zip(self.precip.iter().zip(&self.evap))
            .map(|(&t, (&p, &e))| (t, Forcing::new(p, e)))
    }

    /// Index of the forcing day `t`, if it is part of the series.
    pub fn index_of(&self, t: f64) -> Option<usize> {
        if !t.is_finite() {
            return None;
        }
        let offset = (t - self.start()) / FORCING_STEP;
        let idx = offset.round();
        if (offset - idx).abs() > 1e-9 || idx < 0.0 || idx >= self.len() as f64 {
            return None;
        }
        Some(idx as usize)
    }

    /// Forcing at day index `idx`.
    pub fn get(&self, idx: usize) -> Option<Forcing> {
        Some(Forcing::new(*self.precip.get(idx)?, *self.evap.get(idx)?))
    }

    /// Forcing for day `t`, if it is part of the series.
    pub fn at(&self, t: f64) -> Option<Forcing> {
        self.get(self.index_of(t)?)
    }
}
