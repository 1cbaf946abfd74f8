//! Sequential execution of an erased step chain.

use super::ExecutionOptions;
use crate::core::Value;
use crate::errors::FlowError;
use crate::observability::SpanTimer;
use crate::steps::ErasedStep;
use std::sync::Arc;
use tracing::{debug, debug_span, warn};
use uuid::Uuid;

/// Threads `input` through `steps` in order.
///
/// The first failing step aborts the chain; its error is returned as is.
pub(crate) fn run_steps(
    pipeline: &str,
    steps: &[Arc<dyn ErasedStep>],
    options: &ExecutionOptions,
    input: Value,
) -> Result<Value, FlowError> {
    let run_id = Uuid::new_v4();
    let span = debug_span!("pipeline.execute", pipeline, %run_id, steps = steps.len());
    let _entered = span.enter();
    let timer = SpanTimer::start(pipeline);

    let mut value = input;
    for (index, step) in steps.iter().enumerate() {
        let step_timer = SpanTimer::start(step.name());

        value = match step.execute(value) {
            Ok(next) => next,
            Err(err) => {
                warn!(
                    index,
                    step = step.name(),
                    code = err.code(),
                    error = %err,
                    "Step failed"
                );
                return Err(err);
            }
        };

        let elapsed = step_timer.elapsed();
        if options.trace_steps {
            debug!(
                index,
                step = step_timer.name(),
                duration_ms = step_timer.elapsed_ms(),
                "Step completed"
            );
        }
        if options.is_slow(elapsed) {
            warn!(
                index,
                step = step_timer.name(),
                duration_ms = step_timer.elapsed_ms(),
                "Slow step"
            );
        }
    }

    debug!(duration_ms = timer.elapsed_ms(), "Pipeline completed");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::Step;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn erased<In, Out>(step: Step<In, Out>) -> Arc<dyn ErasedStep>
    where
        In: Send + 'static,
        Out: Send + 'static,
    {
        Arc::new(step)
    }

    #[test]
    fn test_run_steps_in_order() {
        let steps = vec![
            erased(Step::new(|x: i32| x + 1)),
            erased(Step::new(|x: i32| x * 10)),
            erased(Step::new(|x: i32| format!("<{x}>"))),
        ];

        let out = run_steps("order", &steps, &ExecutionOptions::default(), Value::new(1_i32)).unwrap();
        assert_eq!(out.downcast::<String>().unwrap(), "<20>");
    }

    #[test]
    fn test_run_steps_empty_is_identity() {
        let out = run_steps("empty", &[], &ExecutionOptions::default(), Value::new("x")).unwrap();
        assert_eq!(out.downcast::<&str>().unwrap(), "x");
    }

    #[test]
    fn test_failure_stops_chain() {
        let later = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later);

        let steps = vec![
            erased(Step::try_new(|s: String| s.parse::<i32>())),
            erased(Step::new(move |x: i32| {
                counter.fetch_add(1, Ordering::SeqCst);
                x
            })),
        ];

        let err = run_steps(
            "failing",
            &steps,
            &ExecutionOptions::new().with_slow_step_threshold(std::time::Duration::ZERO),
            Value::new("nope".to_string()),
        )
        .unwrap_err();

        assert!(err.is_step_failure());
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }
}
