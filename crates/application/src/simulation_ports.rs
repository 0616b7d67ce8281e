use switchboard_core::AppResult;

/// Source of uniformly distributed draws in `[0, 1)` for simulated probes and checks.
pub trait RandomSource: Send + Sync {
    /// Returns the next draw, or an error when no randomness is available.
    fn next_unit(&self) -> AppResult<f64>;
}
