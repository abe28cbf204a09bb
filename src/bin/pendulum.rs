use std::env;
use std::io::{self, Write};
use std::process;

use ode_sim::models::Pendulum;
use ode_sim::sampler::{sample_into, SampleGrid};
use ode_sim::solver::Dopri5;
use ode_sim::{RunError, SolverError};

// ---------------------------------------------------------------------------
// Pendulum driver: sample theta(t), omega(t) on [0, 100) at 200 points
// ---------------------------------------------------------------------------

const T0: f64 = 0.0;
const T_FINAL: f64 = 100.0;
const SAMPLES: usize = 200;
const RTOL: f64 = 1e-6;
const ATOL: f64 = 1e-8;

fn main() {
    let theta0 = match env::args().nth(1) {
        Some(arg) => match arg.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("pendulum: initial angle {arg:?} is not a decimal number");
                process::exit(1);
            }
        },
        None => {
            eprintln!("usage: pendulum <initial-angle-radians>");
            process::exit(1);
        }
    };

    let mut solver = match Dopri5::new(Pendulum, T0, Pendulum::initial_state(theta0)) {
        Ok(s) => s,
        Err(err) => fail("initialize", &err, None),
    };
    if let Err(err) = solver.set_tolerances(RTOL, ATOL) {
        fail("set_tolerances", &err, None);
    }

    let grid = SampleGrid::new(T_FINAL, SAMPLES);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match sample_into(&mut solver, &grid, &mut out) {
        Ok(_) => {}
        Err(RunError::Solver(err)) => fail("advance_to", &err, Some(&mut out)),
        Err(RunError::Io(err)) => {
            eprintln!("pendulum: output write failed: {err}");
            process::exit(1);
        }
    }

    if let Err(err) = out.flush() {
        eprintln!("pendulum: output write failed: {err}");
        process::exit(1);
    }
}

/// Flush whatever was already emitted, print one diagnostic line, exit 1.
fn fail(operation: &str, err: &SolverError, out: Option<&mut dyn Write>) -> ! {
    if let Some(out) = out {
        let _ = out.flush();
    }
    eprintln!("Error in {operation}: {} ({err})", err.status());
    process::exit(1);
}
