//! Error types for the fluentflow framework.
//!
//! Construction problems (bad arguments, incompatible dynamic steps), runtime
//! type checks at the erased step boundary, and failures raised by the wrapped
//! step functions all surface as [`FlowError`].

use crate::core::TypeTag;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Boxed error produced by a fallible step function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type FlowResult<T> = Result<T, FlowError>;

/// The main error type for fluentflow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// An argument passed while constructing a step or pipeline was invalid.
    #[error("{0}")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// A step was added to a dynamic pipeline whose current output type
    /// does not match the step's input type.
    #[error("{0}")]
    TypeCompatibility(#[from] TypeCompatibilityError),

    /// A step received a value of the wrong runtime type.
    #[error("{0}")]
    TypeMismatch(#[from] TypeMismatchError),

    /// The wrapped step function failed. Display and source are those of
    /// the original error.
    #[error(transparent)]
    Step(BoxError),

    /// An asynchronous execution was cancelled before it completed.
    #[error("Pipeline cancelled: {0}")]
    Cancelled(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An internal consistency error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// Wraps an error raised by a step function.
    pub fn step(err: impl Into<BoxError>) -> Self {
        Self::Step(err.into())
    }

    /// Returns the stable error code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "FLOW-001-INVALID_ARGUMENT",
            Self::TypeCompatibility(_) => "FLOW-002-TYPE_COMPATIBILITY",
            Self::TypeMismatch(_) => "FLOW-003-TYPE_MISMATCH",
            Self::Step(_) => "FLOW-004-STEP_FAILED",
            Self::Cancelled(_) => "FLOW-005-CANCELLED",
            Self::Serialization(_) => "FLOW-006-SERIALIZATION",
            Self::Internal(_) => "FLOW-999-INTERNAL",
        }
    }

    /// Returns true if the error was raised by a step function.
    #[must_use]
    pub fn is_step_failure(&self) -> bool {
        matches!(self, Self::Step(_))
    }

    /// Returns the original error raised by a step function, if any.
    #[must_use]
    pub fn step_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Step(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Downcasts the original step error to a concrete type.
    #[must_use]
    pub fn downcast_step_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Step(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Takes ownership of the original step error.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the error did not come from a step.
    pub fn into_step_error(self) -> Result<BoxError, Self> {
        match self {
            Self::Step(err) => Ok(err),
            other => Err(other),
        }
    }

    /// Builds diagnostic info for this error.
    #[must_use]
    pub fn error_info(&self) -> FlowErrorInfo {
        let info = FlowErrorInfo::new(self.code(), self.to_string());
        match self {
            Self::InvalidArgument(err) => info
                .with_fix_hint("Provide a step function and a non-blank name.")
                .with_context_entry("argument", err.argument.clone()),
            Self::TypeCompatibility(err) => info
                .with_fix_hint(
                    "Insert a step converting the current output into the input the next step expects.",
                )
                .with_context_entry("position", err.position.to_string())
                .with_context_entry("step", err.step.clone())
                .with_context_entry("step_input", err.step_input.clone())
                .with_context_entry("current_output", err.current_output.clone()),
            Self::TypeMismatch(err) => info
                .with_fix_hint("Build the chain with typed add_step calls so adjacent types always line up.")
                .with_context_entry("step", err.step.clone())
                .with_context_entry("expected", err.expected.clone())
                .with_context_entry("actual", err.actual.clone()),
            Self::Internal(_) => {
                info.with_fix_hint("This indicates a bug in fluentflow; please report it.")
            }
            Self::Step(_) | Self::Cancelled(_) | Self::Serialization(_) => info,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = self.error_info().to_dict();
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Metadata about an error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowErrorInfo {
    /// Error code (e.g., "FLOW-003-TYPE_MISMATCH").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl FlowErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::Value::String(self.code.clone()));
        map.insert("summary".to_string(), serde_json::Value::String(self.summary.clone()));

        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }
        if !self.context.is_empty() {
            let context_map: serde_json::Map<String, serde_json::Value> = self
                .context
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            map.insert("context".to_string(), serde_json::Value::Object(context_map));
        }

        map
    }
}

/// Error raised when a step or pipeline is constructed with a bad argument.
#[derive(Debug, Clone, Error)]
#[error("Invalid argument '{argument}': {message}")]
pub struct InvalidArgumentError {
    /// The offending argument.
    pub argument: String,
    /// What was wrong with it.
    pub message: String,
}

impl InvalidArgumentError {
    /// Creates a new invalid argument error.
    #[must_use]
    pub fn new(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            message: message.into(),
        }
    }
}

/// Error raised when a dynamically added step cannot accept the pipeline's
/// current output.
#[derive(Debug, Clone, Error)]
#[error(
    "Incompatible step '{step}' at position {position}: it accepts {step_input} but the pipeline produces {current_output}"
)]
pub struct TypeCompatibilityError {
    /// Index the step would have occupied.
    pub position: usize,
    /// The step name.
    pub step: String,
    /// The input type the step declares.
    pub step_input: String,
    /// The output type the pipeline currently produces.
    pub current_output: String,
}

impl TypeCompatibilityError {
    /// Creates a new type compatibility error.
    #[must_use]
    pub fn new(
        position: usize,
        step: impl Into<String>,
        step_input: TypeTag,
        current_output: TypeTag,
    ) -> Self {
        Self {
            position,
            step: step.into(),
            step_input: step_input.name().to_string(),
            current_output: current_output.name().to_string(),
        }
    }
}

/// Error raised when a step receives a value it cannot accept.
#[derive(Debug, Clone, Error)]
#[error("Type mismatch in '{step}': expected input of type {expected}, got {actual}")]
pub struct TypeMismatchError {
    /// The step (or pipeline) that rejected the value.
    pub step: String,
    /// The expected type.
    pub expected: String,
    /// The type actually received.
    pub actual: String,
}

impl TypeMismatchError {
    /// Creates a new type mismatch error.
    #[must_use]
    pub fn new(step: impl Into<String>, expected: TypeTag, actual: TypeTag) -> Self {
        Self {
            step: step.into(),
            expected: expected.name().to_string(),
            actual: actual.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("boom: {0}")]
    struct Boom(u32);

    #[test]
    fn test_error_info_creation() {
        let info = FlowErrorInfo::new("TEST-001", "Test error")
            .with_fix_hint("Fix this by doing that")
            .with_context_entry("step", "my_step");

        assert_eq!(info.code, "TEST-001");
        assert_eq!(info.summary, "Test error");
        assert_eq!(info.fix_hint, Some("Fix this by doing that".to_string()));
        assert_eq!(info.context.get("step"), Some(&"my_step".to_string()));
    }

    #[test]
    fn test_step_error_is_transparent() {
        let err = FlowError::step(Boom(7));

        assert_eq!(err.to_string(), "boom: 7");
        assert!(err.is_step_failure());
        assert_eq!(err.downcast_step_error::<Boom>().map(|b| b.0), Some(7));
        assert!(err.downcast_step_error::<std::fmt::Error>().is_none());
    }

    #[test]
    fn test_into_step_error() {
        let err = FlowError::step(Boom(1));
        let original = err.into_step_error().unwrap();
        assert!(original.downcast_ref::<Boom>().is_some());

        let err = FlowError::Internal("oops".to_string());
        assert!(err.into_step_error().is_err());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err: FlowError =
            TypeMismatchError::new("double", TypeTag::of::<i32>(), TypeTag::of::<String>()).into();

        let message = err.to_string();
        assert!(message.contains("double"));
        assert!(message.contains("i32"));
        assert!(message.contains("String"));
        assert_eq!(err.code(), "FLOW-003-TYPE_MISMATCH");
    }

    #[test]
    fn test_type_compatibility_to_dict() {
        let err: FlowError =
            TypeCompatibilityError::new(2, "render", TypeTag::of::<u8>(), TypeTag::of::<bool>())
                .into();

        let dict = err.to_dict();
        assert_eq!(dict.get("code").unwrap(), "FLOW-002-TYPE_COMPATIBILITY");
        let context = dict.get("context").unwrap();
        assert_eq!(context["position"], "2");
        assert_eq!(context["step_input"], "u8");
        assert_eq!(context["current_output"], "bool");
    }

    #[test]
    fn test_invalid_argument_code() {
        let err: FlowError = InvalidArgumentError::new("func", "missing").into();
        assert_eq!(err.code(), "FLOW-001-INVALID_ARGUMENT");
        assert!(err.step_error().is_none());
        assert!(err.error_info().fix_hint.is_some());
    }
}
