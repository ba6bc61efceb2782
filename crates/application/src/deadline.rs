use std::future::Future;
use std::time::Duration;

use sion_core::{AppError, AppResult};
use tokio::time::Instant;

/// Caller-supplied limit on how long a store-backed operation may run.
///
/// When the deadline elapses the wrapped future is dropped, which cancels any
/// request it still has outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    #[must_use]
    pub fn none() -> Self {
        Self { at: None }
    }

    /// A deadline expiring `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// Runs `future`, failing with [`AppError::DeadlineExceeded`] on expiry.
    pub async fn run<T, F>(&self, operation: &str, future: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let Some(at) = self.at else {
            return future.await;
        };

        tokio::time::timeout_at(at, future).await.map_err(|_| {
            AppError::DeadlineExceeded(format!("{operation} did not finish before its deadline"))
        })?
    }
}
