use std::io::{self, Write};
use std::process;

use nalgebra::SVector;

use ode_sim::models::Lorenz;
use ode_sim::sampler::{sample_into, SampleGrid};
use ode_sim::solver::Dopri5;
use ode_sim::{RunError, SolverError};

// ---------------------------------------------------------------------------
// Lorenz driver: sample x, y, z on [0, 50) at 5000 points
// ---------------------------------------------------------------------------

const T0: f64 = 0.0;
const T_FINAL: f64 = 50.0;
const SAMPLES: usize = 5000;
const RTOL: f64 = 1e-6;
const ATOL: f64 = 1e-8;

fn main() {
    let y0 = SVector::<f64, 3>::new(1.0, 2.0, 1.0);

    let mut solver = match Dopri5::new(Lorenz::default(), T0, y0) {
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
            eprintln!("lorenz: output write failed: {err}");
            process::exit(1);
        }
    }

    if let Err(err) = out.flush() {
        eprintln!("lorenz: output write failed: {err}");
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
