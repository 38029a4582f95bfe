//! Attempt-then-ignore-failure combinator.

use std::future::Future;

use vaultdesk_core::Result;

/// Awaits `operation` and swallows its error.
///
/// Used for remote calls whose failure must never stop a privilege-reducing
/// transition (lock, logout). The failure is logged at `warn` and `None` is
/// returned; callers proceed with their local state change either way.
pub async fn best_effort<T, F>(operation: &'static str, future: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match future.await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(operation, error = %err, "Best-effort call failed; continuing");
            None
        }
    }
}
