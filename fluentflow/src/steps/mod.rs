//! Step trait and implementations.
//!
//! Steps are the fundamental units of work in a fluentflow pipeline. A
//! [`Step`] wraps one function from `In` to `Out`; pipelines store steps
//! behind the [`ErasedStep`] trait so that a single sequence can hold steps
//! of pairwise different types.

use crate::core::{TypeTag, Value};
use crate::errors::{BoxError, FlowError, InvalidArgumentError, TypeMismatchError};
use std::fmt::Debug;
use std::sync::Arc;

/// Object-safe view of a step with its types erased.
///
/// The typed builder guarantees adjacent steps line up; the runtime check in
/// [`ErasedStep::execute`] still rejects values of the wrong type.
pub trait ErasedStep: Send + Sync + Debug {
    /// Returns the name of the step.
    fn name(&self) -> &str;

    /// Returns the type the step accepts.
    fn input_type(&self) -> TypeTag;

    /// Returns the type the step produces.
    fn output_type(&self) -> TypeTag;

    /// Executes the step on an erased value.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::TypeMismatch`] if `input` is not of the step's
    /// input type, or the step function's own error.
    fn execute(&self, input: Value) -> Result<Value, FlowError>;
}

type StepFn<In, Out> = dyn Fn(In) -> Result<Out, BoxError> + Send + Sync;

/// A typed transformation from `In` to `Out`.
///
/// Steps are immutable. Cloning a step shares the wrapped function.
pub struct Step<In, Out> {
    name: String,
    func: Arc<StepFn<In, Out>>,
}

impl<In, Out> Step<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Creates a step from an infallible function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(In) -> Out + Send + Sync + 'static,
    {
        Self::from_arc(Arc::new(move |input: In| -> Result<Out, BoxError> {
            Ok(func(input))
        }))
    }

    /// Creates a step from a fallible function.
    ///
    /// Errors returned by `func` are surfaced unchanged as
    /// [`FlowError::Step`].
    pub fn try_new<F, E>(func: F) -> Self
    where
        F: Fn(In) -> Result<Out, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::from_arc(Arc::new(move |input: In| -> Result<Out, BoxError> {
            func(input).map_err(Into::into)
        }))
    }

    /// Creates a step from a function that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidArgument`] if `func` is `None`.
    pub fn from_optional<F>(func: Option<F>) -> Result<Self, FlowError>
    where
        F: Fn(In) -> Out + Send + Sync + 'static,
    {
        func.map(Self::new).ok_or_else(|| {
            InvalidArgumentError::new("func", "a step requires a transformation function").into()
        })
    }

    fn from_arc(func: Arc<StepFn<In, Out>>) -> Self {
        Self {
            name: default_name::<In, Out>(),
            func,
        }
    }

    /// Sets the name of the step.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidArgument`] if the name is empty or
    /// whitespace-only.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, FlowError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidArgumentError::new(
                "name",
                "step name cannot be empty or whitespace-only",
            )
            .into());
        }
        self.name = name;
        Ok(self)
    }

    /// Returns the name of the step.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the step directly on a typed value.
    ///
    /// # Errors
    ///
    /// Returns the step function's error as [`FlowError::Step`].
    pub fn call(&self, input: In) -> Result<Out, FlowError> {
        (self.func)(input).map_err(FlowError::Step)
    }

    /// Returns a step that converts its input with `convert` before running
    /// this step. The name is kept.
    pub(crate) fn map_input<New, C>(self, convert: C) -> Step<New, Out>
    where
        New: Send + 'static,
        C: Fn(New) -> In + Send + Sync + 'static,
    {
        let func = self.func;
        Step {
            name: self.name,
            func: Arc::new(move |input: New| -> Result<Out, BoxError> { func(convert(input)) }),
        }
    }
}

fn default_name<In: 'static, Out: 'static>() -> String {
    format!(
        "{} -> {}",
        TypeTag::of::<In>().short_name(),
        TypeTag::of::<Out>().short_name()
    )
}

impl<In, Out> Clone for Step<In, Out> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<In, Out> Debug for Step<In, Out> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("input", &std::any::type_name::<In>())
            .field("output", &std::any::type_name::<Out>())
            .finish()
    }
}

impl<In, Out> ErasedStep for Step<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn input_type(&self) -> TypeTag {
        TypeTag::of::<In>()
    }

    fn output_type(&self) -> TypeTag {
        TypeTag::of::<Out>()
    }

    fn execute(&self, input: Value) -> Result<Value, FlowError> {
        let actual = input.tag();
        let input = input
            .downcast::<In>()
            .map_err(|_| TypeMismatchError::new(&self.name, TypeTag::of::<In>(), actual))?;

        let output = (self.func)(input).map_err(FlowError::Step)?;
        Ok(Value::new(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::ParseIntError;

    #[test]
    fn test_step_call() {
        let step = Step::new(|x: i32| x * 2);

        assert_eq!(step.call(21).unwrap(), 42);
        assert_eq!(step.name(), "i32 -> i32");
    }

    #[test]
    fn test_named_step() {
        let step = Step::new(|s: String| s.len()).with_name("length").unwrap();
        assert_eq!(step.name(), "length");
        assert_eq!(ErasedStep::name(&step), "length");
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Step::new(|x: u8| x).with_name("   ");
        assert!(matches!(result, Err(FlowError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_optional() {
        let missing: Option<fn(i32) -> i32> = None;
        let err = Step::<i32, i32>::from_optional(missing).unwrap_err();
        match err {
            FlowError::InvalidArgument(e) => assert_eq!(e.argument, "func"),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }

        let present = Step::from_optional(Some(|x: i32| x + 1)).unwrap();
        assert_eq!(present.call(1).unwrap(), 2);
    }

    #[test]
    fn test_erased_execute() {
        let step = Step::new(|x: i32| x.to_string());

        assert_eq!(step.input_type(), TypeTag::of::<i32>());
        assert_eq!(step.output_type(), TypeTag::of::<String>());

        let out = ErasedStep::execute(&step, Value::new(7_i32)).unwrap();
        assert_eq!(out.downcast::<String>().unwrap(), "7");
    }

    #[test]
    fn test_erased_execute_type_mismatch() {
        let step = Step::new(|x: i32| x * 2).with_name("double").unwrap();

        let err = ErasedStep::execute(&step, Value::new("21".to_string())).unwrap_err();
        match err {
            FlowError::TypeMismatch(e) => {
                assert_eq!(e.step, "double");
                assert_eq!(e.expected, "i32");
                assert_eq!(e.actual, std::any::type_name::<String>());
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_no_numeric_coercion() {
        let step = Step::new(|x: i64| x + 1);
        let err = ErasedStep::execute(&step, Value::new(1_i32)).unwrap_err();
        assert!(matches!(err, FlowError::TypeMismatch(_)));
    }

    #[test]
    fn test_fallible_step_error_passthrough() {
        let step = Step::try_new(|s: String| s.parse::<i32>());

        let err = step.call("abc".to_string()).unwrap_err();
        let expected = "abc".parse::<i32>().unwrap_err();
        assert_eq!(err.downcast_step_error::<ParseIntError>(), Some(&expected));
        assert_eq!(err.to_string(), expected.to_string());
    }

    #[test]
    fn test_clone_shares_function() {
        let step = Step::new(|x: u32| x + 1);
        let copy = step.clone();
        assert_eq!(copy.call(1).unwrap(), step.call(1).unwrap());
    }

    #[test]
    fn test_map_input() {
        let step = Step::new(|x: i64| x * 10).with_name("scale").unwrap();
        let widened: Step<i32, i64> = step.map_input(i64::from);

        assert_eq!(widened.name(), "scale");
        assert_eq!(widened.call(4).unwrap(), 40);
    }
}
