pub mod rk4;
pub mod dopri;

pub use rk4::Rk4;
pub use dopri::Dopri5;

use nalgebra::SVector;

use crate::error::SolverError;

// ---------------------------------------------------------------------------
// Integrator capability
// ---------------------------------------------------------------------------

/// Time-advancing view of an initialized ODE integrator.
///
/// An integrator owns the system, the current internal time and state, and
/// whatever work arrays its method needs. The sampling loop only ever asks it
/// to move forward:
///
/// - `advance_to(t_target)` integrates from the current internal time to
///   exactly `t_target` and returns the reached time together with a snapshot
///   of the state. A target equal to the current time is a no-op; a target
///   behind it is an error. On any failure the integrator must be considered
///   unusable for the rest of the run.
/// - `time()` reports the current internal time.
///
/// Backends are interchangeable: anything honoring this contract can sit
/// under the same sampling loop and models. Disposal is `Drop`.
pub trait Integrator<const N: usize> {
    fn advance_to(&mut self, t_target: f64) -> Result<(f64, SVector<f64, N>), SolverError>;

    fn time(&self) -> f64;
}

/// Reject non-positive error tolerances.
pub(crate) fn validate_tolerances(rtol: f64, atol: f64) -> Result<(), SolverError> {
    if rtol > 0.0 && atol > 0.0 && rtol.is_finite() && atol.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidTolerance { rtol, atol })
    }
}

/// Reject initial states with NaN or infinite components.
pub(crate) fn validate_initial_state<const N: usize>(
    y0: &SVector<f64, N>,
) -> Result<(), SolverError> {
    if y0.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SolverError::NonFiniteInitialState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_validation_rejects_non_positive() {
        assert!(validate_tolerances(1e-6, 1e-8).is_ok());
        assert!(matches!(
            validate_tolerances(0.0, 1e-8),
            Err(SolverError::InvalidTolerance { .. })
        ));
        assert!(matches!(
            validate_tolerances(1e-6, -1.0),
            Err(SolverError::InvalidTolerance { .. })
        ));
        assert!(validate_tolerances(f64::NAN, 1e-8).is_err());
    }

    #[test]
    fn initial_state_validation_rejects_non_finite() {
        let ok = SVector::<f64, 2>::new(1.0, 0.0);
        assert!(validate_initial_state(&ok).is_ok());
        let bad = SVector::<f64, 2>::new(f64::NAN, 0.0);
        assert!(matches!(
            validate_initial_state(&bad),
            Err(SolverError::NonFiniteInitialState)
        ));
        let inf = SVector::<f64, 2>::new(0.0, f64::INFINITY);
        assert!(validate_initial_state(&inf).is_err());
    }
}
