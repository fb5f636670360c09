//! Uniform error contract for façade methods.

use std::future::Future;

use crate::error::{Failure, Result, handle_api_error};

/// Run `operation`, normalizing any failure with `context` as its label.
///
/// Success values pass through untouched. Every façade method is a single
/// call to this function, so callers always see an [`ApiError`](crate::ApiError)
/// whose message starts with `[<Facade>.<method>]`.
pub async fn api_call<T, E, F>(context: &str, operation: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<Failure>,
{
    match operation.await {
        Ok(value) => Ok(value),
        Err(e) => handle_api_error(e, Some(context)),
    }
}
