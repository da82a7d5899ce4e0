//! Saturation-excess flux transfer function.
//!
//! Relative flux as a function of relative storage and a single shape
//! parameter:
//!
//! ```text
//! f(s, a) = (1 - exp(-a s)) / (1 - exp(-a))
//! ```
use crate::constants::{LINEAR_LIMIT, MAX_EXP_ARG};

/// Relative flux for relative storage `s` and shape parameter `a`.
///
/// `s` is saturated to `[0, 1]` before use. For `|a| <= 1e-5` the curve is
/// replaced by its linear limit `s`. Exponent arguments above 600 are capped,
/// so large-magnitude shape parameters stay finite instead of overflowing.
#[inline]
pub fn flux(s: f64, a: f64) -> f64 {
    let s = s.clamp(0.0, 1.0);

    if a.abs() <= LINEAR_LIMIT {
        return s;
    }

    let num = 1.0 - (-a * s).min(MAX_EXP_ARG).exp();
    let den = 1.0 - (-a).min(MAX_EXP_ARG).exp();
    num / den
}
