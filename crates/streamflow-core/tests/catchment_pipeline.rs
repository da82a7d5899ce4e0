use approx::assert_relative_eq;

use streamflow_core::forcing::{Forcing, ForcingSeries};
use streamflow_core::model::RiverModel;
use streamflow_core::ode::CatchmentOde;
use streamflow_core::params::{CalibratedParameters, Parameters};
use streamflow_core::solver::{integrate, SolverOptions};
use streamflow_core::state::State;
use streamflow_core::ModelError;

fn storm_series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let times: Vec<f64> = (0..n).map(|t| t as f64).collect();
    let precip: Vec<f64> = (0..n)
        .map(|t| if t % 5 == 0 { 15.0 } else { 0.0 })
        .collect();
    let evap: Vec<f64> = (0..n).map(|t| 2.0 + (t % 3) as f64).collect();
    (times, precip, evap)
}

fn good_params() -> CalibratedParameters {
    CalibratedParameters::from_array([9.0, 200.0, 7.0, 85.0, 0.2, 70.0, 2.5])
}

#[test]
fn total_water_is_conserved_without_evaporation() {
    let params = Parameters::new(2.5, 100.0, 7.0, 1.0, -0.5, 60.0, 3.25, 0.0, 50.0);
    let precip = [0.0, 10.0, 0.0, 20.0, 20.0, 0.0, 1.0];
    let opts = SolverOptions::adaptive(1e-10, 1e-12);

    let mut y = State::dry().to_array().to_vec();
    for (day, &p) in precip.iter().enumerate() {
        let sys = CatchmentOde::new(Forcing::new(p, 0.0), params);
        let t0 = day as f64;
        y = integrate(&sys, &y, t0, t0 + 1.0, &opts).unwrap();
    }

    // Storages plus discharged water equal everything that fell.
    let total: f64 = y.iter().sum();
    assert_relative_eq!(total, precip.iter().sum::<f64>(), max_relative = 1e-8);
    assert!(y[4] > 0.0, "some water should have been discharged");
}

#[test]
fn adaptive_and_fixed_step_agree() {
    let (times, precip, evap) = storm_series(60);
    let forcing = ForcingSeries::new(times.clone(), precip, evap).unwrap();

    let accurate = RiverModel::new(forcing.clone(), SolverOptions::adaptive(1e-9, 1e-11)).unwrap();
    let fixed = RiverModel::new(forcing, SolverOptions::fixed(200)).unwrap();

    let q_accurate = accurate.simulate(&good_params(), &times).unwrap();
    let q_fixed = fixed.simulate(&good_params(), &times).unwrap();

    for (a, b) in q_accurate.iter().zip(&q_fixed) {
        assert_relative_eq!(*a, *b, epsilon = 1e-4, max_relative = 1e-3);
    }
}

#[test]
fn discharge_never_exceeds_rainfall() {
    let (times, precip, evap) = storm_series(120);
    let total_rain: f64 = precip.iter().sum();
    let forcing = ForcingSeries::new(times.clone(), precip, evap).unwrap();
    let model = RiverModel::new(forcing, SolverOptions::default()).unwrap();

    let q = model.simulate(&good_params(), &times).unwrap();
    let total_q: f64 = q.iter().sum();
    assert!(q.iter().all(|v| v.is_finite()));
    assert!(total_q > 0.0);
    assert!(total_q <= total_rain);
}

#[test]
fn extreme_shape_parameters_stay_finite() {
    let (times, precip, evap) = storm_series(30);
    let forcing = ForcingSeries::new(times.clone(), precip, evap).unwrap();
    let model = RiverModel::new(forcing, SolverOptions::fixed(48))
        .unwrap()
        .with_shapes(-1e4, 1e4);
    let mut p = good_params();
    p.alpha_e = 1e6;
    p.alpha_f = -1e6;

    let q = model.simulate(&p, &times).unwrap();
    assert!(q.iter().all(|v| v.is_finite()));
}

#[test]
fn parallel_draws_are_independent() {
    let (times, precip, evap) = storm_series(90);
    let forcing = ForcingSeries::new(times.clone(), precip, evap).unwrap();
    let model = RiverModel::new(forcing, SolverOptions::default()).unwrap();

    let draws: Vec<CalibratedParameters> = (0..16)
        .map(|i| {
            let mut p = good_params();
            p.q_smax = 6.0 + 0.25 * i as f64;
            p
        })
        .collect();

    let parallel = model.simulate_many(&draws, &times);
    for (draw, result) in draws.iter().zip(parallel) {
        assert_eq!(result, model.simulate(draw, &times));
    }
}

#[test]
fn data_outside_forcing_is_rejected() {
    let (times, precip, evap) = storm_series(10);
    let forcing = ForcingSeries::new(times, precip, evap).unwrap();
    let model = RiverModel::new(forcing, SolverOptions::default()).unwrap();

    let err = model.simulate(&good_params(), &[3.0, 42.0]).unwrap_err();
    assert_eq!(err, ModelError::DataUnavailable { time: 42.0 });
}
