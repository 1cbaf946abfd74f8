//! Pipeline building and execution.
//!
//! This module provides:
//! - The typed, type-state [`Pipeline`] builder
//! - The runtime-checked [`DynamicPipeline`]
//! - Offloaded execution through [`PipelineTask`]
//! - Execution options

mod builder;
mod dynamic;
mod executor;
mod options;
mod task;

pub use builder::{Pipeline, DEFAULT_PIPELINE_NAME};
pub use dynamic::DynamicPipeline;
pub use options::ExecutionOptions;
pub use task::PipelineTask;
