//! Offloaded pipeline execution.

use crate::errors::FlowError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Handle to a pipeline execution running on the blocking pool.
///
/// Awaiting the handle yields the same result a synchronous execution
/// would have returned. A panic raised by a step is resumed on the awaiting
/// task.
#[derive(Debug)]
#[must_use = "a pipeline task does nothing observable unless awaited"]
pub struct PipelineTask<T> {
    handle: JoinHandle<Result<T, FlowError>>,
}

impl<T: Send + 'static> PipelineTask<T> {
    /// Runs `job` on the Tokio blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub(crate) fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<T, FlowError> + Send + 'static,
    {
        Self {
            handle: tokio::task::spawn_blocking(job),
        }
    }
}

impl<T> PipelineTask<T> {
    /// Cancels the execution if it has not started yet.
    ///
    /// Once the steps are running they complete normally.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Returns true if the execution has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for PipelineTask<T> {
    type Output = Result<T, FlowError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join_error)) if join_error.is_panic() => {
                std::panic::resume_unwind(join_error.into_panic())
            }
            Poll::Ready(Err(join_error)) => {
                Poll::Ready(Err(FlowError::Cancelled(join_error.to_string())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[tokio::test]
    async fn test_task_returns_result() {
        let task = PipelineTask::spawn(|| Ok::<_, FlowError>(5_u8));
        assert_eq!(task.await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_task_returns_error() {
        let task: PipelineTask<u8> = PipelineTask::spawn(|| Err(FlowError::Internal("x".into())));
        assert!(matches!(task.await, Err(FlowError::Internal(_))));
    }

    #[tokio::test]
    #[should_panic(expected = "step exploded")]
    async fn test_task_resumes_panic() {
        let task: PipelineTask<()> = PipelineTask::spawn(|| panic!("step exploded"));
        let _ = task.await;
    }

    #[test]
    fn test_abort_before_start_cancels() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .max_blocking_threads(1)
            .build()
            .unwrap();

        runtime.block_on(async {
            let (started_tx, started_rx) = mpsc::channel();
            let (release_tx, release_rx) = mpsc::channel::<()>();

            let first = PipelineTask::spawn(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                Ok::<_, FlowError>(1_u8)
            });
            started_rx.recv().unwrap();

            // The only blocking thread is busy, so this one is still queued.
            let second = PipelineTask::spawn(|| Ok::<_, FlowError>(2_u8));
            second.abort();
            release_tx.send(()).unwrap();

            assert_eq!(first.await.unwrap(), 1);
            assert!(matches!(second.await, Err(FlowError::Cancelled(_))));
        });
    }
}
