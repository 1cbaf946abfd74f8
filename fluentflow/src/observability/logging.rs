//! Subscriber setup for applications embedding fluentflow.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application. [`init_tracing`] is a convenience for
//! binaries, tests and benchmarks.

use crate::errors::{FlowError, InvalidArgumentError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "FLUENTFLOW_LOG";

/// Environment variable enabling JSON output.
pub const LOG_JSON_ENV: &str = "FLUENTFLOW_LOG_JSON";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `fluentflow=debug`.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Include the event target in each line.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `FLUENTFLOW_LOG` and `FLUENTFLOW_LOG_JSON`, falling back to
    /// the defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(json) = lookup(LOG_JSON_ENV) {
            config.json = matches!(json.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    /// Sets the filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enables or disables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Enables or disables event targets.
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, FlowError> {
        EnvFilter::try_new(&self.filter).map_err(|e| {
            InvalidArgumentError::new("filter", format!("invalid filter '{}': {e}", self.filter))
                .into()
        })
    }
}

/// Installs a global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`FlowError::InvalidArgument`] for an unparsable filter, or
/// [`FlowError::Internal`] if a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), FlowError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init()
    };

    result.map_err(|e| FlowError::Internal(format!("failed to install tracing subscriber: {e}")))
}
