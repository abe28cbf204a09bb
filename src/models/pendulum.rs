use nalgebra::SVector;

use crate::ode::OdeSystem;

// ---------------------------------------------------------------------------
// Simple pendulum (unit length, unit gravity)
// ---------------------------------------------------------------------------

/// Undamped pendulum in nondimensional form.
///
/// State: `y = (theta, omega)` — angle from the vertical and angular
/// velocity. Equations:
///
///   dtheta/dt = omega
///   domega/dt = -sin(theta)
///
/// The system is autonomous; `t` is unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pendulum;

impl Pendulum {
    /// State vector for release from rest at angle `theta0`.
    pub fn initial_state(theta0: f64) -> SVector<f64, 2> {
        SVector::<f64, 2>::new(theta0, 0.0)
    }
}

impl OdeSystem<2> for Pendulum {
    fn rhs(&self, _t: f64, y: &SVector<f64, 2>, dydt: &mut SVector<f64, 2>) {
        dydt[0] = y[1];
        dydt[1] = -y[0].sin();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
