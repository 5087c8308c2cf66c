// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Fetch-with-fallback combinator used by every aggregator operation.
///
/// Each source call is attempted exactly once. A failure is logged as a
/// warning naming the operation and replaced by the caller's default, so it
/// never propagates past the field it was meant to populate.
use std::future::Future;

use masterror::AppError;
use tracing::{debug, warn};

/// Outcome of a single source call: a value or the failure that replaced it.
pub type SourceResult<T> = Result<T, AppError>;

/// Awaits `operation` and substitutes `fallback()` when it fails.
///
/// # Arguments
///
/// * `operation_name` - Name of the operation for logging
/// * `operation` - Future performing the source call
/// * `fallback` - Producer of the default value, only invoked on failure
///
/// # Example
///
/// ```no_run
/// use masterror::AppError;
/// use profile_dynamo::with_fallback;
///
/// # async fn example() {
/// let followers = with_fallback(
///     "followers",
///     async { Err::<u64, _>(AppError::service("rate limited")) },
///     || 0
/// )
/// .await;
/// assert_eq!(followers, 0);
/// # }
/// ```
pub async fn with_fallback<T, Fut, D>(operation_name: &str, operation: Fut, fallback: D) -> T
where
    Fut: Future<Output = SourceResult<T>>,
    D: FnOnce() -> T
{
    match operation.await {
        Ok(value) => {
            debug!("{} succeeded", operation_name);
            value
        }
        Err(error) => {
            warn!("{} failed, using fallback: {}", operation_name, describe(&error));
            fallback()
        }
    }
}

/// Renders `error` as its kind followed by the adapter's message.
///
/// `AppError`'s `Display` prints only the kind, so logs and propagated
/// errors go through this instead.
///
/// ```
/// use masterror::AppError;
/// use profile_dynamo::describe;
///
/// let error = AppError::service("rate limited upstream");
/// assert_eq!(describe(&error), "Service error: rate limited upstream");
/// ```
pub fn describe(error: &AppError) -> String {
    match error.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => format!("{}: {}", error.kind, message),
        _ => error.kind.to_string()
    }
}

/// Like [`with_fallback`] but substitutes `None`, for fields whose default is
/// absence.
pub async fn optional<T, Fut>(operation_name: &str, operation: Fut) -> Option<T>
where
    Fut: Future<Output = SourceResult<T>>
{
    with_fallback(operation_name, async { operation.await.map(Some) }, || None).await
}
