use thiserror::Error;

// ---------------------------------------------------------------------------
// Solver errors
// ---------------------------------------------------------------------------

/// Failures of the integration capability.
///
/// Every variant is fatal for the run: drivers print one diagnostic line and
/// exit non-zero. Nothing here is retried or degraded into partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("tolerances must both be > 0 (got rtol = {rtol}, atol = {atol})")]
    InvalidTolerance { rtol: f64, atol: f64 },
    #[error("initial state contains a non-finite component")]
    NonFiniteInitialState,
    #[error("target time {target} is behind current time {current}")]
    TargetBeforeCurrentTime { target: f64, current: f64 },
    #[error("step size underflow at t = {t}")]
    StepSizeUnderflow { t: f64 },
    #[error("exceeded {max_steps} internal steps at t = {t} before reaching target")]
    MaxStepsExceeded { t: f64, max_steps: usize },
}

impl SolverError {
    /// Stable negative status code for stderr diagnostics, in the style of
    /// C solver flag values.
    pub fn status(&self) -> i32 {
        match self {
            SolverError::MaxStepsExceeded { .. } => -1,
            SolverError::StepSizeUnderflow { .. } => -3,
            SolverError::NonFiniteInitialState => -8,
            SolverError::InvalidTolerance { .. } => -22,
            SolverError::TargetBeforeCurrentTime { .. } => -23,
        }
    }
}

// ---------------------------------------------------------------------------
// Sampling-run errors
// ---------------------------------------------------------------------------

/// Failures of a sampling run: either the integrator gave up or the output
/// sink did.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("integration failed: {0}")]
    Solver(#[from] SolverError),
    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),
}
