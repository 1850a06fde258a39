//! Isolated, time-bounded collaborator calls.

use std::future::Future;
use std::time::Duration;

use tracing::error;

use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::result::AppResult;

/// Run one collaborator call in its own task under `limit`.
///
/// Whatever goes wrong (an error, a timeout, a panic) comes back as an
/// error of kind `failure`, logged with the collaborator name. The calling
/// task never unwinds.
pub async fn call_guarded<T, Fut>(
    collaborator: &'static str,
    limit: Duration,
    failure: ErrorKind,
    call: Fut,
) -> AppResult<T>
where
    T: Send + 'static,
    Fut: Future<Output = AppResult<T>> + Send + 'static,
{
    let handle = tokio::spawn(async move { tokio::time::timeout(limit, call).await });

    let err = match handle.await {
        Ok(Ok(Ok(value))) => return Ok(value),
        Ok(Ok(Err(e))) => {
            error!(collaborator, kind = %e.kind, error = %e, "Collaborator call failed");
            if e.kind == failure {
                return Err(e);
            }
            let message = format!("{collaborator} failed: {}", e.message);
            AppError::with_source(failure, message, e)
        }
        Ok(Err(_elapsed)) => {
            error!(collaborator, timeout_secs = limit.as_secs(), "Collaborator call timed out");
            AppError::new(
                failure,
                format!("{collaborator} timed out after {}s", limit.as_secs()),
            )
        }
        Err(join) if join.is_panic() => {
            error!(collaborator, error = %join, "Collaborator call panicked");
            AppError::new(failure, format!("{collaborator} panicked"))
        }
        Err(join) => {
            error!(collaborator, error = %join, "Collaborator call was cancelled");
            AppError::new(failure, format!("{collaborator} was cancelled"))
        }
    };
    Err(err)
}
