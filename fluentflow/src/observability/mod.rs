//! Observability utilities.

mod logging;
mod timing;

pub use logging::{init_tracing, LogConfig, LOG_ENV, LOG_JSON_ENV};
pub use timing::SpanTimer;
