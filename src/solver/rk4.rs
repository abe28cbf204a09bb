use nalgebra::SVector;

use crate::error::SolverError;
use crate::ode::OdeSystem;
use crate::solver::{validate_initial_state, validate_tolerances, Integrator};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta, fixed step
// ---------------------------------------------------------------------------

/// Fixed-step RK4 backend.
///
/// `advance_to` splits the requested interval into equal steps no larger
/// than `max_step`, so it always lands exactly on the target time.
#[derive(Debug, Clone)]
pub struct Rk4<const N: usize, S: OdeSystem<N>> {
    system: S,
    t: f64,
    y: SVector<f64, N>,
    max_step: f64,
}

impl<const N: usize, S: OdeSystem<N>> Rk4<N, S> {
    pub const DEFAULT_MAX_STEP: f64 = 0.01;

    pub fn new(system: S, t0: f64, y0: SVector<f64, N>) -> Result<Self, SolverError> {
        validate_initial_state(&y0)?;
        Ok(Self {
            system,
            t: t0,
            y: y0,
            max_step: Self::DEFAULT_MAX_STEP,
        })
    }

    /// Step-size ceiling. Steps shrink to divide each interval evenly.
    pub fn set_max_step(&mut self, h: f64) {
        debug_assert!(h > 0.0);
        self.max_step = h;
    }

    /// Accepted for interface parity with adaptive backends and validated,
    /// but a fixed-step method has no error control: accuracy is governed by
    /// `set_max_step` alone.
    pub fn set_tolerances(&mut self, rtol: f64, atol: f64) -> Result<(), SolverError> {
        validate_tolerances(rtol, atol)
    }

    /// Single RK4 step of size `h` from the current state.
    fn step(&mut self, h: f64) {
        let mut k1 = SVector::<f64, N>::zeros();
        let mut k2 = SVector::<f64, N>::zeros();
        let mut k3 = SVector::<f64, N>::zeros();
        let mut k4 = SVector::<f64, N>::zeros();

        self.system.rhs(self.t, &self.y, &mut k1);
        self.system.rhs(self.t + h * 0.5, &(self.y + k1 * (h * 0.5)), &mut k2);
        self.system.rhs(self.t + h * 0.5, &(self.y + k2 * (h * 0.5)), &mut k3);
        self.system.rhs(self.t + h, &(self.y + k3 * h), &mut k4);

        self.y += (k1 + (k2 + k3) * 2.0 + k4) * (h / 6.0);
        self.t += h;
    }
}

impl<const N: usize, S: OdeSystem<N>> Integrator<N> for Rk4<N, S> {
    fn advance_to(&mut self, t_target: f64) -> Result<(f64, SVector<f64, N>), SolverError> {
        if t_target < self.t {
            return Err(SolverError::TargetBeforeCurrentTime {
                target: t_target,
                current: self.t,
            });
        }
        let span = t_target - self.t;
        if span > 0.0 {
            let n_steps = (span / self.max_step).ceil().max(1.0) as usize;
            let h = span / n_steps as f64;
            for _ in 0..n_steps {
                self.step(h);
            }
            // Equal division leaves only rounding dust; land exactly.
            self.t = t_target;
        }
        Ok((self.t, self.y))
    }

    fn time(&self) -> f64 {
        self.t
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// y' = -y, y(0) = 1 -> y(t) = e^{-t}
    struct Decay;

    impl OdeSystem<1> for Decay {
        fn rhs(&self, _t: f64, y: &SVector<f64, 1>, dydt: &mut SVector<f64, 1>) {
            dydt[0] = -y[0];
        }
    }

    /// y'' = -y as a first-order system; energy y0^2 + y1^2 is conserved.
    struct Harmonic;

    impl OdeSystem<2> for Harmonic {
        fn rhs(&self, _t: f64, y: &SVector<f64, 2>, dydt: &mut SVector<f64, 2>) {
            dydt[0] = y[1];
            dydt[1] = -y[0];
        }
    }

    #[test]
    fn decay_matches_analytic_solution() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let mut solver = Rk4::new(Decay, 0.0, y0).unwrap();
        let (t, y) = solver.advance_to(2.0).unwrap();
        assert_eq!(t, 2.0);
        let exact = (-2.0_f64).exp();
        assert!(
            (y[0] - exact).abs() < 1e-8,
            "RK4 with h <= 0.01 should hit e^-2 to ~1e-8, got {} vs {}",
            y[0],
            exact
        );
    }

    #[test]
    fn lands_exactly_on_awkward_targets() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let mut solver = Rk4::new(Decay, 0.0, y0).unwrap();
        for k in 1..50 {
            let target = k as f64 * 0.7 / 13.0;
            let (t, _) = solver.advance_to(target).unwrap();
            assert_eq!(t, target, "reached time must equal the requested time");
        }
    }

    #[test]
    fn harmonic_energy_conserved_over_many_periods() {
        let y0 = SVector::<f64, 2>::new(1.0, 0.0);
        let mut solver = Rk4::new(Harmonic, 0.0, y0).unwrap();
        let (_, y) = solver.advance_to(20.0 * std::f64::consts::PI).unwrap();
        let energy = y[0] * y[0] + y[1] * y[1];
        assert!(
            (energy - 1.0).abs() < 1e-6,
            "energy drifted to {energy} after 10 periods"
        );
    }

    #[test]
    fn backwards_target_is_rejected() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let mut solver = Rk4::new(Decay, 1.0, y0).unwrap();
        assert!(matches!(
            solver.advance_to(0.5),
            Err(SolverError::TargetBeforeCurrentTime { .. })
        ));
    }

    #[test]
    fn zero_span_is_a_no_op() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let mut solver = Rk4::new(Decay, 1.0, y0).unwrap();
        let (t, y) = solver.advance_to(1.0).unwrap();
        assert_eq!(t, 1.0);
        assert_eq!(y[0], 1.0);
    }

    #[test]
    fn non_finite_initial_state_is_rejected() {
        let y0 = SVector::<f64, 1>::new(f64::NAN);
        assert!(matches!(
            Rk4::new(Decay, 0.0, y0),
            Err(SolverError::NonFiniteInitialState)
        ));
    }
}
