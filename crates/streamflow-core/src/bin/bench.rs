/// Pure Rust core benchmarks for the catchment model.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use streamflow_core::forcing::{Forcing, ForcingSeries};
use streamflow_core::model::RiverModel;
use streamflow_core::ode::ode_rhs;
use streamflow_core::params::{CalibratedParameters, Parameters};
use streamflow_core::solver::SolverOptions;
use streamflow_core::state::State;
use tracing_subscriber::EnvFilter;

const REPEATS: usize = 7;

/// Simple LCG PRNG for deterministic data generation.
fn make_data(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let precip: Vec<f64> = (0..n)
        .map(|_| {
            let wet = next_f64() < 0.4;
            if wet {
                next_f64() * 25.0
            } else {
                0.0
            }
        })
        .collect();
    let evap: Vec<f64> = (0..n).map(|_| 0.5 + next_f64() * 4.5).collect();
    (precip, evap)
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_rhs(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let params = Parameters::new(9.0, 200.0, 7.0, 85.0, 0.2, 70.0, 2.5, 0.0, 50.0);
    let mut results = Vec::new();

    for &n in sizes {
        let (precip, evap) = make_data(n, 42);
        let states: Vec<State> = (0..n)
            .map(|i| State {
                interception: (i % 10) as f64,
                unsaturated: (i % 250) as f64,
                slow: (i % 40) as f64,
                fast: (i % 7) as f64,
                discharge: 0.0,
            })
            .collect();

        let mut eval = || {
            for ((s, &p), &e) in states.iter().zip(&precip).zip(&evap) {
                black_box(ode_rhs(0.0, black_box(s), &Forcing::new(p, e), &params));
            }
        };

        // Warmup
        eval();

        let dur = median_time(&mut eval);
        results.push(("ode_rhs", n, dur));
    }
    results
}

fn bench_simulate(sizes: &[usize], name: &'static str, options: SolverOptions) -> Vec<(&'static str, usize, Duration)> {
    let params = CalibratedParameters::from_array([9.0, 200.0, 7.0, 85.0, 0.2, 70.0, 2.5]);
    let mut results = Vec::new();

    for &n in sizes {
        let (precip, evap) = make_data(n, 42);
        let times: Vec<f64> = (0..n).map(|t| t as f64).collect();
        let forcing = match ForcingSeries::new(times.clone(), precip, evap) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("invalid benchmark forcing: {e}");
                return results;
            }
        };
        let model = match RiverModel::new(forcing, options) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("invalid benchmark options: {e}");
                return results;
            }
        };

        // Warmup
        if let Err(e) = black_box(model.simulate(&params, &times)) {
            eprintln!("{name} failed at n={n}: {e}");
            continue;
        }

        let dur = median_time(|| {
            let _ = black_box(model.simulate(&params, &times));
        });
        results.push((name, n, dur));
    }
    results
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Pure Rust Core Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>8}   {:>12}", "Case", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_rhs(&[10_000, 1_000_000]));
    all_results.extend(bench_simulate(&[365, 3650], "simulate_dopri", SolverOptions::default()));
    all_results.extend(bench_simulate(&[365, 3650], "simulate_rk4", SolverOptions::fixed(24)));

    for (case, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>8}      {:>8.2}", case, n, ms);
    }

    println!("============================================================");
}
