use nalgebra::SVector;

use crate::ode::OdeSystem;

// ---------------------------------------------------------------------------
// Lorenz system
// ---------------------------------------------------------------------------

/// Coefficients of the Lorenz equations. Created once at startup and
/// read-only for the lifetime of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for LorenzParams {
    /// Classic chaotic parameter set: sigma = 10, rho = 28, beta = 8/3.
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

/// The Lorenz 3-variable system.
///
/// State: `y = (x, y, z)`. Equations:
///
///   dx/dt = sigma * (y - x)
///   dy/dt = x * (rho - z) - y
///   dz/dt = x * y - beta * z
///
/// Autonomous; `t` is unused.
#[derive(Debug, Clone, Copy)]
pub struct Lorenz {
    pub params: LorenzParams,
}

impl Lorenz {
    pub fn new(params: LorenzParams) -> Self {
        Self { params }
    }
}

impl Default for Lorenz {
    fn default() -> Self {
        Self::new(LorenzParams::default())
    }
}

impl OdeSystem<3> for Lorenz {
    fn rhs(&self, _t: f64, y: &SVector<f64, 3>, dydt: &mut SVector<f64, 3>) {
        let p = &self.params;
        dydt[0] = p.sigma * (y[1] - y[0]);
        dydt[1] = y[0] * (p.rho - y[2]) - y[1];
        dydt[2] = y[0] * y[1] - p.beta * y[2];
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
