//! Per-request deadline and cancellation

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DistanceMatrixError;

/// Deadline and cancellation signal for one top-level request
///
/// Checked before every call and raced against every wait, so an expired
/// or cancelled context never yields a partial result.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// Context without deadline that is never cancelled unless asked to
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Use the given cancellation token
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Token that cancels this context
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Fail if the context is cancelled or past its deadline
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded`.
    pub fn check(&self) -> Result<(), DistanceMatrixError> {
        if self.cancellation.is_cancelled() {
            return Err(DistanceMatrixError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(DistanceMatrixError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `future` unless the context expires or is cancelled first
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded` if the context ends first,
    /// otherwise whatever `future` returns.
    pub async fn run<T, F>(&self, future: F) -> Result<T, DistanceMatrixError>
    where
        F: Future<Output = Result<T, DistanceMatrixError>>,
    {
        self.check()?;
        let expiry = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(DistanceMatrixError::Cancelled),
            () = expiry => Err(DistanceMatrixError::DeadlineExceeded),
            result = future => result,
        }
    }

    /// Sleep for `duration` unless the context ends first
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded` if the context ends first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), DistanceMatrixError> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}
