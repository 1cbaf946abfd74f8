//! Typed pipeline builder.

use super::executor::run_steps;
use super::{DynamicPipeline, ExecutionOptions, PipelineTask};
use crate::core::{PipelineDescriptor, StepDescriptor, TypeTag, Value};
use crate::errors::{BoxError, FlowError, InvalidArgumentError};
use crate::steps::{ErasedStep, Step};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Default name given to pipelines built with [`Pipeline::new`].
pub const DEFAULT_PIPELINE_NAME: &str = "pipeline";

/// A linear chain of steps taking an `In` and producing an `Out`.
///
/// The type parameters are the builder's state. An empty pipeline is a
/// `Pipeline<T, T>` and returns its input unchanged. Each call to
/// [`add_step`](Self::add_step) consumes the current stage and returns the
/// next one, owning the same step sequence plus one appended step; the
/// compiler rejects any step whose input is not the current output.
///
/// ```rust
/// use fluentflow::prelude::*;
///
/// let pipeline = Pipeline::<String>::new()
///     .add_step(Step::try_new(|s: String| s.parse::<i32>()))
///     .add_step(Step::new(|x: i32| x * 2))
///     .add_step(Step::new(|x: i32| x.to_string()));
///
/// assert_eq!(pipeline.execute("42".to_string()).unwrap(), "84");
/// ```
pub struct Pipeline<In, Out = In> {
    /// The pipeline name.
    name: String,
    /// The steps, in execution order.
    steps: Vec<Arc<dyn ErasedStep>>,
    /// Reporting options.
    options: ExecutionOptions,
    _types: PhantomData<fn(In) -> Out>,
}

impl<T: Send + 'static> Pipeline<T> {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_PIPELINE_NAME.to_string(),
            steps: Vec::new(),
            options: ExecutionOptions::default(),
            _types: PhantomData,
        }
    }

    /// Creates an empty pipeline with a name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or whitespace-only.
    pub fn named(name: impl Into<String>) -> Result<Self, FlowError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidArgumentError::new(
                "name",
                "pipeline name cannot be empty or whitespace-only",
            )
            .into());
        }

        Ok(Self {
            name,
            ..Self::new()
        })
    }
}

impl<T: Send + 'static> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In, Out> Pipeline<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Appends a step accepting the current output.
    #[must_use]
    pub fn add_step<Next>(self, step: Step<Out, Next>) -> Pipeline<In, Next>
    where
        Next: Send + 'static,
    {
        self.push(Arc::new(step))
    }

    /// Appends a step whose input the current output converts into.
    ///
    /// The conversion runs inside the appended step, so the chain still
    /// grows by exactly one step.
    #[must_use]
    pub fn add_step_into<Mid, Next>(self, step: Step<Mid, Next>) -> Pipeline<In, Next>
    where
        Out: Into<Mid>,
        Mid: Send + 'static,
        Next: Send + 'static,
    {
        self.push(Arc::new(step.map_input(|value: Out| value.into())))
    }

    /// Appends an infallible function as a step.
    #[must_use]
    pub fn then<Next, F>(self, func: F) -> Pipeline<In, Next>
    where
        Next: Send + 'static,
        F: Fn(Out) -> Next + Send + Sync + 'static,
    {
        self.add_step(Step::new(func))
    }

    /// Appends a fallible function as a step.
    #[must_use]
    pub fn try_then<Next, E, F>(self, func: F) -> Pipeline<In, Next>
    where
        Next: Send + 'static,
        E: Into<BoxError>,
        F: Fn(Out) -> Result<Next, E> + Send + Sync + 'static,
    {
        self.add_step(Step::try_new(func))
    }

    /// Appends every step of `other`, keeping this pipeline's name and
    /// options.
    #[must_use]
    pub fn append<Next>(mut self, other: Pipeline<Out, Next>) -> Pipeline<In, Next>
    where
        Next: Send + 'static,
    {
        self.steps.extend(other.steps);
        self.retype()
    }

    /// Sets the execution options.
    #[must_use]
    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    fn push<Next>(mut self, step: Arc<dyn ErasedStep>) -> Pipeline<In, Next> {
        self.steps.push(step);
        self.retype()
    }

    fn retype<Next>(self) -> Pipeline<In, Next> {
        Pipeline {
            name: self.name,
            steps: self.steps,
            options: self.options,
            _types: PhantomData,
        }
    }

    /// Runs every step in order on `input`.
    ///
    /// # Errors
    ///
    /// Returns the first step failure unchanged. A [`FlowError::Internal`]
    /// means the final value did not have the declared output type.
    pub fn execute(&self, input: In) -> Result<Out, FlowError> {
        let value = run_steps(&self.name, &self.steps, &self.options, Value::new(input))?;

        value.downcast::<Out>().map_err(|value| {
            FlowError::Internal(format!(
                "pipeline '{}' produced {} where {} was declared",
                self.name,
                value.type_name(),
                std::any::type_name::<Out>()
            ))
        })
    }

    /// Runs [`execute`](Self::execute) on the Tokio blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn execute_async(&self, input: In) -> PipelineTask<Out> {
        let pipeline = self.clone();
        PipelineTask::spawn(move || pipeline.execute(input))
    }

    /// Erases the type state, keeping the steps.
    #[must_use]
    pub fn into_dynamic(self) -> DynamicPipeline {
        DynamicPipeline::from_parts(
            self.name,
            TypeTag::of::<In>(),
            TypeTag::of::<Out>(),
            self.steps,
            self.options,
        )
    }

    /// Describes the pipeline.
    #[must_use]
    pub fn describe(&self) -> PipelineDescriptor {
        describe_steps(&self.name, TypeTag::of::<In>(), TypeTag::of::<Out>(), &self.steps)
    }
}

impl<In, Out> Pipeline<In, Out> {
    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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

    /// Returns the step names in execution order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Returns the execution options.
    #[must_use]
    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }
}

pub(crate) fn describe_steps(
    name: &str,
    input: TypeTag,
    output: TypeTag,
    steps: &[Arc<dyn ErasedStep>],
) -> PipelineDescriptor {
    steps
        .iter()
        .enumerate()
        .fold(PipelineDescriptor::new(name, input, output), |descriptor, (index, step)| {
            descriptor.with_step(StepDescriptor::new(
                index,
                step.name(),
                step.input_type(),
                step.output_type(),
            ))
        })
}

impl<In, Out> Clone for Pipeline<In, Out> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            steps: self.steps.clone(),
            options: self.options.clone(),
            _types: PhantomData,
        }
    }
}

impl<In, Out> fmt::Debug for Pipeline<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .field("input", &std::any::type_name::<In>())
            .field("output", &std::any::type_name::<Out>())
            .finish()
    }
}
