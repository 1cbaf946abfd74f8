//! Mock steps for testing.

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use crate::steps::Step;

/// Error raised by [`failing_step`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TestStepError(pub String);

/// A shared log of step invocations.
///
/// Steps created through a log record their label each time they run, in
/// the order they ran.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a step that records `label` and passes its input through.
    pub fn passthrough<T: Send + 'static>(&self, label: impl Into<String>) -> Step<T, T> {
        self.wrap(label, |value: T| value)
    }

    /// Returns a step that records `label` and then runs `func`.
    pub fn wrap<In, Out, F>(&self, label: impl Into<String>, func: F) -> Step<In, Out>
    where
        In: Send + 'static,
        Out: Send + 'static,
        F: Fn(In) -> Out + Send + Sync + 'static,
    {
        let calls = Arc::clone(&self.calls);
        let label = label.into();
        Step::new(move |input: In| {
            calls.lock().push(label.clone());
            func(input)
        })
    }

    /// Returns the recorded labels.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Returns a step that always fails with [`TestStepError`].
pub fn failing_step<In, Out>(message: impl Into<String>) -> Step<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    let message = message.into();
    Step::try_new(move |_input: In| Err::<Out, _>(TestStepError(message.clone())))
}

/// Returns a step that panics with `message`.
pub fn panicking_step<In, Out>(message: &'static str) -> Step<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    Step::new(move |_input: In| -> Out { panic!("{}", message) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_records_in_order() {
        let log = CallLog::new();
        let a = log.passthrough::<u8>("a");
        let b = log.wrap("b", |x: u8| x + 1);

        assert_eq!(b.call(a.call(1).unwrap()).unwrap(), 2);
        assert_eq!(log.calls(), vec!["a", "b"]);
        assert_eq!(log.len(), 2);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_failing_step() {
        let step = failing_step::<u8, u8>("nope");
        let err = step.call(1).unwrap_err();
        assert_eq!(
            err.downcast_step_error::<TestStepError>(),
            Some(&TestStepError("nope".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "kaboom")]
    fn test_panicking_step() {
        let step = panicking_step::<u8, u8>("kaboom");
        let _ = step.call(1);
    }
}
