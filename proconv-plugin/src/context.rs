//! Evaluation Context

/// Decimal places used when rendering a converted value for display
pub const DEFAULT_DECIMALS: usize = 4;

/// Upper bound on display decimals a caller may request
pub const MAX_DECIMALS: usize = 12;

/// Evaluation context passed to plugins
#[derive(Debug, Clone)]
pub struct EvalContext {
    pub decimals: usize,
}

impl EvalContext {
    pub fn new() -> Self {
        Self { decimals: DEFAULT_DECIMALS }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
