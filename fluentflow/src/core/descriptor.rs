//! Serializable descriptions of built pipelines.

use super::TypeTag;
use crate::errors::FlowError;
use serde::{Deserialize, Serialize};

/// Description of a single step in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Position of the step in the chain.
    pub index: usize,
    /// The step name.
    pub name: String,
    /// The input type, with module paths stripped.
    pub input_type: String,
    /// The output type, with module paths stripped.
    pub output_type: String,
}

impl StepDescriptor {
    /// Creates a new step descriptor.
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>, input: TypeTag, output: TypeTag) -> Self {
        Self {
            index,
            name: name.into(),
            input_type: input.short_name(),
            output_type: output.short_name(),
        }
    }
}

/// Description of an entire pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    /// The pipeline name.
    pub name: String,
    /// The type the pipeline accepts.
    pub input_type: String,
    /// The type the pipeline produces.
    pub output_type: String,
    /// The steps, in execution order.
    #[serde(default)]
    pub steps: Vec<StepDescriptor>,
}

impl PipelineDescriptor {
    /// Creates a descriptor with no steps.
    #[must_use]
    pub fn new(name: impl Into<String>, input: TypeTag, output: TypeTag) -> Self {
        Self {
            name: name.into(),
            input_type: input.short_name(),
            output_type: output.short_name(),
            steps: Vec::new(),
        }
    }

    /// Appends a step description.
    #[must_use]
    pub fn with_step(mut self, step: StepDescriptor) -> Self {
        self.steps.push(step);
        self
    }

    /// Returns the chain of types, e.g. `String -> i32 -> String`.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut parts = vec![self.input_type.as_str()];
        parts.extend(self.steps.iter().map(|s| s.output_type.as_str()));
        parts.join(" -> ")
    }

    /// Serializes the descriptor to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String, FlowError> {
        serde_json::to_string_pretty(self).map_err(|e| FlowError::Serialization(e.to_string()))
    }
}
