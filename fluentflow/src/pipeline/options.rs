//! Execution options for pipelines.

use std::time::Duration;

/// Options controlling how a pipeline reports its execution.
///
/// Options never change what a pipeline computes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Emit a debug event for each completed step.
    pub trace_steps: bool,
    /// Steps running at least this long are logged at warn level.
    pub slow_step_threshold: Option<Duration>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            trace_steps: true,
            slow_step_threshold: None,
        }
    }
}

impl ExecutionOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables per-step debug events.
    #[must_use]
    pub fn with_trace_steps(mut self, enabled: bool) -> Self {
        self.trace_steps = enabled;
        self
    }

    /// Sets the slow step threshold.
    #[must_use]
    pub fn with_slow_step_threshold(mut self, threshold: Duration) -> Self {
        self.slow_step_threshold = Some(threshold);
        self
    }

    pub(crate) fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_step_threshold
            .is_some_and(|threshold| elapsed >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = ExecutionOptions::default();
        assert!(options.trace_steps);
        assert!(options.slow_step_threshold.is_none());
        assert!(!options.is_slow(Duration::from_secs(3600)));
    }

    #[test]
    fn test_options_builder() {
        let options = ExecutionOptions::new()
            .with_trace_steps(false)
            .with_slow_step_threshold(Duration::from_millis(50));

        assert!(!options.trace_steps);
        assert!(options.is_slow(Duration::from_millis(50)));
        assert!(!options.is_slow(Duration::from_millis(49)));
    }
}
