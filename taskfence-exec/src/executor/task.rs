use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

type TaskBody = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), TaskError>> + Send>;

#[derive(Debug, thiserror::Error)]
pub enum TaskFault {
    #[error("{0}")]
    Message(String),
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// A zero-argument unit of work that either completes or fails.
///
/// The executor consumes a task when a worker runs it and keeps nothing
/// afterwards.
pub struct Task {
    body: TaskBody,
}

impl Task {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            body: Box::new(move || f().boxed()),
        }
    }

    /// Runs `f` on the blocking thread pool, so a body that sleeps or does
    /// synchronous I/O holds its worker without stalling the runtime.
    pub fn blocking<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), TaskError> + Send + 'static,
    {
        Self::new(move || async move {
            match tokio::task::spawn_blocking(f).await {
                Ok(result) => result,
                Err(e) if e.is_panic() => {
                    Err(TaskFault::Panicked(panic_message(e.into_panic().as_ref())).into())
                }
                Err(e) => Err(TaskFault::Message(e.to_string()).into()),
            }
        })
    }

    pub fn ok() -> Self {
        Self::new(|| async { Ok(()) })
    }

    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move || async move {
            let err: TaskError = TaskFault::Message(message).into();
            Err(err)
        })
    }

    /// Runs the body, turning a panic into an ordinary failure.
    pub(crate) async fn execute(self) -> Result<(), TaskError> {
        let body = self.body;
        match AssertUnwindSafe(async move { body().await })
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(TaskFault::Panicked(panic_message(payload.as_ref())).into()),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
