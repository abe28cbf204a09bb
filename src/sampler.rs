use std::io::Write;

use nalgebra::SVector;

use crate::error::{RunError, SolverError};
use crate::io::table::write_record;
use crate::solver::Integrator;

// ---------------------------------------------------------------------------
// Output-time grid
// ---------------------------------------------------------------------------

/// Evenly spaced output times `t_k = k * t_final / samples` for
/// `k = 1 .. samples-1`.
///
/// The endpoints are deliberately excluded: the initial state is not echoed
/// back, and `t_final` itself is never requested. A grid with `samples <= 1`
/// is empty.
#[derive(Debug, Clone, Copy)]
pub struct SampleGrid {
    pub t_final: f64,
    pub samples: usize,
}

impl SampleGrid {
    pub fn new(t_final: f64, samples: usize) -> Self {
        Self { t_final, samples }
    }

    /// Strictly increasing output times. Empty for `samples <= 1`; the
    /// divisor is only touched when there is at least one point, so a zero
    /// `samples` cannot divide by zero.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (1..self.samples).map(move |k| k as f64 * self.t_final / self.samples as f64)
    }

    /// Number of records a run over this grid emits.
    pub fn len(&self) -> usize {
        self.samples.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.samples <= 1
    }
}

// ---------------------------------------------------------------------------
// Sampling runs
// ---------------------------------------------------------------------------

/// One retained trajectory point (time, state snapshot).
#[derive(Debug, Clone)]
pub struct Sample<const N: usize> {
    pub t: f64,
    pub y: SVector<f64, N>,
}

/// Drive `integrator` across the grid, writing one record per output time.
///
/// Records are serialized and discarded immediately; nothing is retained.
/// The first `advance_to` failure aborts the run with no partial record for
/// that step, and any remaining output times are skipped. Returns the number
/// of records emitted.
pub fn sample_into<const N: usize, I, W>(
    integrator: &mut I,
    grid: &SampleGrid,
    writer: &mut W,
) -> Result<usize, RunError>
where
    I: Integrator<N>,
    W: Write,
{
    let mut emitted = 0;
    for t_out in grid.times() {
        let (t, y) = integrator.advance_to(t_out)?;
        write_record(writer, t, &y)?;
        emitted += 1;
    }
    Ok(emitted)
}

/// Like [`sample_into`], but keep the trajectory in memory instead of
/// serializing it. Used by the viewer and by tests that inspect states.
pub fn sample_collect<const N: usize, I>(
    integrator: &mut I,
    grid: &SampleGrid,
) -> Result<Vec<Sample<N>>, SolverError>
where
    I: Integrator<N>,
{
    let mut trajectory = Vec::with_capacity(grid.len());
    for t_out in grid.times() {
        let (t, y) = integrator.advance_to(t_out)?;
        trajectory.push(Sample { t, y });
    }
    Ok(trajectory)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lorenz, Pendulum};
    use crate::ode::OdeSystem;
    use crate::solver::{Dopri5, Rk4};

    struct Decay;

    impl OdeSystem<1> for Decay {
        fn rhs(&self, _t: f64, y: &SVector<f64, 1>, dydt: &mut SVector<f64, 1>) {
            dydt[0] = -y[0];
        }
    }

    #[test]
    fn grid_times_are_strictly_increasing_below_final() {
        let grid = SampleGrid::new(100.0, 200);
        let times: Vec<f64> = grid.times().collect();
        assert_eq!(times.len(), 199);
        for w in times.windows(2) {
            assert!(w[0] < w[1], "times must be strictly increasing");
        }
        assert!(
            *times.last().unwrap() < grid.t_final,
            "the final time itself is never sampled"
        );
        assert!((times[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_grids_are_empty() {
        assert_eq!(SampleGrid::new(50.0, 0).times().count(), 0);
        assert_eq!(SampleGrid::new(50.0, 1).times().count(), 0);
        assert!(SampleGrid::new(50.0, 1).is_empty());
        assert_eq!(SampleGrid::new(50.0, 0).len(), 0);
    }

    #[test]
    fn record_count_matches_grid() {
        let mut solver = Dopri5::new(Decay, 0.0, SVector::<f64, 1>::new(1.0)).unwrap();
        let grid = SampleGrid::new(5.0, 50);
        let mut buf = Vec::new();
        let emitted = sample_into(&mut solver, &grid, &mut buf).unwrap();
        assert_eq!(emitted, 49);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 49);
    }

    #[test]
    fn empty_grid_emits_nothing_and_succeeds() {
        let mut solver = Dopri5::new(Decay, 0.0, SVector::<f64, 1>::new(1.0)).unwrap();
        let mut buf = Vec::new();
        let emitted =
            sample_into(&mut solver, &SampleGrid::new(5.0, 1), &mut buf).unwrap();
        assert_eq!(emitted, 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn pendulum_equilibrium_emits_all_zero_components() {
        let mut solver =
            Dopri5::new(Pendulum, 0.0, Pendulum::initial_state(0.0)).unwrap();
        solver.set_tolerances(1e-6, 1e-8).unwrap();
        let grid = SampleGrid::new(100.0, 200);
        let mut buf = Vec::new();
        sample_into(&mut solver, &grid, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 199);
        for line in text.lines() {
            let fields: Vec<&str> = line.split(' ').collect();
            assert_eq!(fields.len(), 3);
            assert_eq!(fields[1], "0.0000000000000000e+00", "angle in: {line}");
            assert_eq!(fields[2], "0.0000000000000000e+00", "velocity in: {line}");
        }
    }

    #[test]
    fn lorenz_run_emits_four_fields_per_line() {
        let mut solver =
            Dopri5::new(Lorenz::default(), 0.0, SVector::<f64, 3>::new(1.0, 2.0, 1.0))
                .unwrap();
        solver.set_tolerances(1e-6, 1e-8).unwrap();
        let grid = SampleGrid::new(1.0, 100);
        let mut buf = Vec::new();
        sample_into(&mut solver, &grid, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 99);
        for line in text.lines() {
            assert_eq!(line.split(' ').count(), 4);
        }
    }

    #[test]
    fn identical_runs_are_byte_identical() {
        let run = || {
            let mut solver =
                Dopri5::new(Lorenz::default(), 0.0, SVector::<f64, 3>::new(1.0, 2.0, 1.0))
                    .unwrap();
            solver.set_tolerances(1e-6, 1e-8).unwrap();
            let mut buf = Vec::new();
            sample_into(&mut solver, &SampleGrid::new(2.0, 200), &mut buf).unwrap();
            buf
        };
        assert_eq!(run(), run(), "integration must be deterministic");
    }

    #[test]
    fn integration_failure_aborts_with_no_partial_record() {
        let mut solver = Dopri5::new(Decay, 0.0, SVector::<f64, 1>::new(1.0)).unwrap();
        solver.set_max_steps(1);
        let grid = SampleGrid::new(1.0e6, 4);
        let mut buf = Vec::new();
        let err = sample_into(&mut solver, &grid, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            RunError::Solver(SolverError::MaxStepsExceeded { .. })
        ));
        assert!(buf.is_empty(), "failed step must not leave partial output");
    }

    #[test]
    fn collected_trajectory_matches_grid_times() {
        let mut solver = Rk4::new(Decay, 0.0, SVector::<f64, 1>::new(1.0)).unwrap();
        let grid = SampleGrid::new(2.0, 20);
        let trajectory = sample_collect(&mut solver, &grid).unwrap();
        assert_eq!(trajectory.len(), 19);
        for (sample, t_expected) in trajectory.iter().zip(grid.times()) {
            assert_eq!(sample.t, t_expected);
            let exact = (-sample.t).exp();
            assert!(
                (sample.y[0] - exact).abs() < 1e-7,
                "decay sample at t = {} drifted: {} vs {exact}",
                sample.t,
                sample.y[0]
            );
        }
    }
}
