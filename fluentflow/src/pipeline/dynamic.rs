//! Runtime-checked pipeline for chains assembled from erased steps.

use super::builder::{describe_steps, DEFAULT_PIPELINE_NAME};
use super::executor::run_steps;
use super::{ExecutionOptions, PipelineTask};
use crate::core::{PipelineDescriptor, TypeTag, Value};
use crate::errors::{FlowError, InvalidArgumentError, TypeCompatibilityError, TypeMismatchError};
use crate::steps::ErasedStep;
use std::sync::Arc;

/// A pipeline whose types are tracked at runtime.
///
/// Steps are checked as they are added: a step is accepted only if its
/// input type equals the pipeline's current output type.
#[derive(Debug, Clone)]
pub struct DynamicPipeline {
    name: String,
    input_type: TypeTag,
    output_type: TypeTag,
    steps: Vec<Arc<dyn ErasedStep>>,
    options: ExecutionOptions,
}

impl DynamicPipeline {
    /// Creates an empty pipeline accepting values of `input_type`.
    #[must_use]
    pub fn new(input_type: TypeTag) -> Self {
        Self::from_parts(
            DEFAULT_PIPELINE_NAME.to_string(),
            input_type,
            input_type,
            Vec::new(),
            ExecutionOptions::default(),
        )
    }

    /// Creates an empty pipeline accepting values of type `T`.
    #[must_use]
    pub fn for_input<T: Send + 'static>() -> Self {
        Self::new(TypeTag::of::<T>())
    }

    pub(crate) fn from_parts(
        name: String,
        input_type: TypeTag,
        output_type: TypeTag,
        steps: Vec<Arc<dyn ErasedStep>>,
        options: ExecutionOptions,
    ) -> Self {
        Self {
            name,
            input_type,
            output_type,
            steps,
            options,
        }
    }

    /// Sets the pipeline name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or whitespace-only.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, FlowError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidArgumentError::new(
                "name",
                "pipeline name cannot be empty or whitespace-only",
            )
            .into());
        }
        self.name = name;
        Ok(self)
    }

    /// Sets the execution options.
    #[must_use]
    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends a step.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::TypeCompatibility`] if the step does not accept
    /// the current output type.
    pub fn add_step<S>(self, step: S) -> Result<Self, FlowError>
    where
        S: ErasedStep + 'static,
    {
        self.add_shared(Arc::new(step))
    }

    /// Appends a shared step.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::TypeCompatibility`] if the step does not accept
    /// the current output type.
    pub fn add_shared(mut self, step: Arc<dyn ErasedStep>) -> Result<Self, FlowError> {
        if step.input_type() != self.output_type {
            return Err(TypeCompatibilityError::new(
                self.steps.len(),
                step.name(),
                step.input_type(),
                self.output_type,
            )
            .into());
        }

        self.push_unchecked(step);
        Ok(self)
    }

    /// Appends a step without checking its input type.
    ///
    /// A mismatching step is still caught when execution reaches it, as a
    /// [`FlowError::TypeMismatch`].
    pub fn push_unchecked(&mut self, step: Arc<dyn ErasedStep>) {
        self.output_type = step.output_type();
        self.steps.push(step);
    }

    /// Runs every step in order on `input`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::TypeMismatch`] if `input` is not of the input
    /// type, otherwise the first step failure unchanged.
    pub fn execute(&self, input: Value) -> Result<Value, FlowError> {
        if input.tag() != self.input_type {
            return Err(TypeMismatchError::new(&self.name, self.input_type, input.tag()).into());
        }

        run_steps(&self.name, &self.steps, &self.options, input)
    }

    /// Runs the pipeline on a typed input and downcasts the result.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute); additionally a
    /// [`FlowError::TypeMismatch`] if the result is not a `U`.
    pub fn execute_as<T, U>(&self, input: T) -> Result<U, FlowError>
    where
        T: Send + 'static,
        U: Send + 'static,
    {
        let value = self.execute(Value::new(input))?;
        let actual = value.tag();
        value
            .downcast::<U>()
            .map_err(|_| TypeMismatchError::new(&self.name, TypeTag::of::<U>(), actual).into())
    }

    /// Runs [`execute`](Self::execute) on the Tokio blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn execute_async(&self, input: Value) -> PipelineTask<Value> {
        let pipeline = self.clone();
        PipelineTask::spawn(move || pipeline.execute(input))
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type the pipeline accepts.
    #[must_use]
    pub fn input_type(&self) -> TypeTag {
        self.input_type
    }

    /// Returns the type the pipeline currently produces.
    #[must_use]
    pub fn output_type(&self) -> TypeTag {
        self.output_type
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Describes the pipeline.
    #[must_use]
    pub fn describe(&self) -> PipelineDescriptor {
        describe_steps(&self.name, self.input_type, self.output_type, &self.steps)
    }
}
