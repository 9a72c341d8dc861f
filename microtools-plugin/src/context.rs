//! Evaluation Context

/// Fractional digits used when a result is rendered for display
pub const DEFAULT_PRECISION: u32 = 6;

/// Upper bound for display digits; f64 carries ~15-17 significant digits
pub const MAX_PRECISION: u32 = 15;

/// Evaluation context passed to plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    pub precision: u32,
}

impl EvalContext {
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }

    /// Set display precision, clamped to [`MAX_PRECISION`]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.min(MAX_PRECISION);
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
