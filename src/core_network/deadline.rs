use crate::core_error::SessionError;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::time;

/// Runs a data-connection step, giving up after `limit`.
///
/// `what` names the step for the timeout error. The future is dropped on
/// timeout, which releases any socket it owns.
pub async fn within<F, T>(limit: Duration, what: &'static str, step: F) -> Result<T, SessionError>
where
    F: Future<Output = io::Result<T>>,
{
    match time::timeout(limit, step).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(SessionError::DataConnection(e)),
        Err(_) => Err(SessionError::DataConnectionTimeout(what)),
    }
}
