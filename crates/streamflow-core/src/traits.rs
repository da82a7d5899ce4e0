/// Right-hand side of an ODE system `dy/dt = f(t, y)`.
///
/// The interface every integrator in [`crate::solver`] consumes. Implementors
/// must be pure in `(t, y)` so a system can be shared across threads.
pub trait OdeSystem {
    /// Number of state variables.
    fn ndim(&self) -> usize;

    /// Evaluate `f(t, y)` and write it into `dydt`.
    ///
    /// `y` and `dydt` both have length `ndim()`.
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]);
}
