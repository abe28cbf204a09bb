use nalgebra::SVector;

use crate::error::SolverError;
use crate::ode::OdeSystem;
use crate::solver::{validate_initial_state, validate_tolerances, Integrator};

// ---------------------------------------------------------------------------
// Dormand-Prince 5(4) adaptive integrator
// ---------------------------------------------------------------------------

// Butcher tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (advancing solution, local extrapolation)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between 5th- and embedded 4th-order weights (error estimate)
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Step-size controller
const SAFETY: f64 = 0.9;
const MIN_SCALE: f64 = 0.2;
const MAX_SCALE: f64 = 5.0;

/// Adaptive Dormand-Prince 5(4) backend with FSAL.
///
/// `advance_to` takes error-controlled internal steps, clamping the last one
/// so the returned time equals the requested target. Local truncation error
/// per step is held to `atol + rtol * |y|` in a scaled RMS norm.
#[derive(Debug, Clone)]
pub struct Dopri5<const N: usize, S: OdeSystem<N>> {
    system: S,
    t: f64,
    y: SVector<f64, N>,
    /// Derivative at (t, y); reused across steps (first-same-as-last).
    k1: SVector<f64, N>,
    rtol: f64,
    atol: f64,
    /// Next trial step size; non-positive until the first advance.
    h: f64,
    max_steps: usize,
    min_step: f64,
}

impl<const N: usize, S: OdeSystem<N>> Dopri5<N, S> {
    pub const DEFAULT_RTOL: f64 = 1e-6;
    pub const DEFAULT_ATOL: f64 = 1e-9;
    pub const DEFAULT_MAX_STEPS: usize = 100_000;
    pub const DEFAULT_MIN_STEP: f64 = 1e-14;

    pub fn new(system: S, t0: f64, y0: SVector<f64, N>) -> Result<Self, SolverError> {
        validate_initial_state(&y0)?;
        let mut k1 = SVector::<f64, N>::zeros();
        system.rhs(t0, &y0, &mut k1);
        Ok(Self {
            system,
            t: t0,
            y: y0,
            k1,
            rtol: Self::DEFAULT_RTOL,
            atol: Self::DEFAULT_ATOL,
            h: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
            min_step: Self::DEFAULT_MIN_STEP,
        })
    }

    /// Configure local truncation error control. Both tolerances must be
    /// strictly positive.
    pub fn set_tolerances(&mut self, rtol: f64, atol: f64) -> Result<(), SolverError> {
        validate_tolerances(rtol, atol)?;
        self.rtol = rtol;
        self.atol = atol;
        Ok(())
    }

    /// Ceiling on internal steps per `advance_to` call.
    pub fn set_max_steps(&mut self, n: usize) {
        debug_assert!(n > 0);
        self.max_steps = n;
    }

    pub fn state(&self) -> &SVector<f64, N> {
        &self.y
    }
}

impl<const N: usize, S: OdeSystem<N>> Integrator<N> for Dopri5<N, S> {
    fn advance_to(&mut self, t_target: f64) -> Result<(f64, SVector<f64, N>), SolverError> {
        if t_target < self.t {
            return Err(SolverError::TargetBeforeCurrentTime {
                target: t_target,
                current: self.t,
            });
        }
        if t_target == self.t {
            return Ok((self.t, self.y));
        }

        if self.h <= 0.0 {
            self.h = (t_target - self.t) / 10.0;
        }

        let mut k2 = SVector::<f64, N>::zeros();
        let mut k3 = SVector::<f64, N>::zeros();
        let mut k4 = SVector::<f64, N>::zeros();
        let mut k5 = SVector::<f64, N>::zeros();
        let mut k6 = SVector::<f64, N>::zeros();
        let mut k7 = SVector::<f64, N>::zeros();

        for _ in 0..self.max_steps {
            let remaining = t_target - self.t;
            let clamped = self.h >= remaining;
            let h = if clamped { remaining } else { self.h };
            let t = self.t;

            self.system
                .rhs(t + C2 * h, &(self.y + self.k1 * (A21 * h)), &mut k2);
            self.system.rhs(
                t + C3 * h,
                &(self.y + (self.k1 * A31 + k2 * A32) * h),
                &mut k3,
            );
            self.system.rhs(
                t + C4 * h,
                &(self.y + (self.k1 * A41 + k2 * A42 + k3 * A43) * h),
                &mut k4,
            );
            self.system.rhs(
                t + C5 * h,
                &(self.y + (self.k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h),
                &mut k5,
            );
            self.system.rhs(
                t + h,
                &(self.y + (self.k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
                &mut k6,
            );

            let y_new =
                self.y + (self.k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
            self.system.rhs(t + h, &y_new, &mut k7);

            let err_vec =
                (self.k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
            let mut err = 0.0;
            for i in 0..N {
                let scale = self.atol + self.rtol * self.y[i].abs().max(y_new[i].abs());
                let r = err_vec[i] / scale;
                err += r * r;
            }
            err = (err / N as f64).sqrt();

            if err <= 1.0 {
                self.t = if clamped { t_target } else { t + h };
                self.y = y_new;
                self.k1 = k7;

                let scale = if err == 0.0 {
                    MAX_SCALE
                } else {
                    (SAFETY * err.powf(-0.2)).clamp(MIN_SCALE, MAX_SCALE)
                };
                self.h = h * scale;

                if clamped {
                    return Ok((self.t, self.y));
                }
            } else {
                let scale = (SAFETY * err.powf(-0.2)).clamp(MIN_SCALE, 1.0);
                let h_new = h * scale;
                if h_new < self.min_step {
                    return Err(SolverError::StepSizeUnderflow { t: self.t });
                }
                self.h = h_new;
            }
        }

        Err(SolverError::MaxStepsExceeded {
            t: self.t,
            max_steps: self.max_steps,
        })
    }

    fn time(&self) -> f64 {
        self.t
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
