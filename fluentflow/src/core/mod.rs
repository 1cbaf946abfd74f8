//! Core types shared by steps and pipelines.
//!
//! This module contains:
//! - Runtime type tags for the types flowing through a pipeline
//! - The erased value passed between steps
//! - Serializable pipeline and step descriptors

mod descriptor;
mod type_tag;
mod value;

pub use descriptor::{PipelineDescriptor, StepDescriptor};
pub use type_tag::TypeTag;
pub use value::Value;
