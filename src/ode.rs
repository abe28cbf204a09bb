use nalgebra::SVector;

// ---------------------------------------------------------------------------
// User-supplied ODE system
// ---------------------------------------------------------------------------

/// Right-hand side of an ODE system `dy/dt = f(t, y)`.
///
/// Implement this trait for your problem; the integrator calls `rhs` with the
/// current time `t` and state `y` and expects `dydt` to be filled with the
/// derivative values. The dimension `N` is fixed at compile time.
///
/// `rhs` must be a pure function of `(t, y, self)`: an integrator is free to
/// call it any number of times per accepted step (stage evaluations, rejected
/// trials), in any order.
///
/// # Example
///
/// ```ignore
/// struct Decay { rate: f64 }
/// impl OdeSystem<1> for Decay {
///     fn rhs(&self, _t: f64, y: &SVector<f64, 1>, dydt: &mut SVector<f64, 1>) {
///         dydt[0] = -self.rate * y[0];
///     }
/// }
/// ```
pub trait OdeSystem<const N: usize> {
    fn rhs(&self, t: f64, y: &SVector<f64, N>, dydt: &mut SVector<f64, N>);
}
