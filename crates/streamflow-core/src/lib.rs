//! streamflow — rainfall-runoff catchment model in Rust.
//!
//! Five coupled ODEs over interception, unsaturated, slow and fast reservoir
//! storages plus a cumulative discharge accumulator. The derivative evaluator
//! in [`ode`] is pure and allocation free so integrators and inference loops
//! can call it from any number of threads.
pub mod constants;
pub mod error;
pub mod flux;
pub mod forcing;
pub mod model;
pub mod ode;
pub mod params;
pub mod solver;
pub mod state;
pub mod traits;

pub use error::{ModelError, ModelResult};
pub use flux::flux;
pub use ode::ode_rhs;
