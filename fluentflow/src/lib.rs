//! # Fluentflow
//!
//! Typed, linear transformation pipelines.
//!
//! Fluentflow composes steps, each a function from one type to another, into
//! a single pipeline:
//!
//! - **Type-state building**: each added step must accept the previous
//!   step's output, checked by the compiler
//! - **Erased storage**: steps of different types live in one ordered chain
//! - **Sequential execution**: one input flows through every step in order
//! - **Offloading**: the same chain can run on the Tokio blocking pool
//!
//! ## Quick Start
//!
//! ```rust
//! use fluentflow::prelude::*;
//!
//! let parse = Step::try_new(|s: String| s.parse::<i32>());
//! let double = Step::new(|x: i32| x * 2);
//! let render = Step::new(|x: i32| x.to_string());
//!
//! let pipeline = Pipeline::<String>::new()
//!     .add_step(parse)
//!     .add_step(double)
//!     .add_step(render);
//!
//! assert_eq!(pipeline.execute("42".to_string()).unwrap(), "84");
//! assert!(pipeline.execute("abc".to_string()).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod steps;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{PipelineDescriptor, StepDescriptor, TypeTag, Value};
    pub use crate::errors::{
        BoxError, FlowError, FlowErrorInfo, FlowResult, InvalidArgumentError,
        TypeCompatibilityError, TypeMismatchError,
    };
    pub use crate::observability::{init_tracing, LogConfig};
    pub use crate::pipeline::{DynamicPipeline, ExecutionOptions, Pipeline, PipelineTask};
    pub use crate::steps::{ErasedStep, Step};
}
