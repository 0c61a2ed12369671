//! Single-segment path parameter extractor with typed parsing.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use std::str::FromStr;

/// Extractor for an `{id}` path segment parsed into `T`.
///
/// Unparseable values are rejected with `400 Bad Request` before the
/// handler runs.
///
/// # Example
/// ```ignore
/// use axum_helpers::IdPath;
///
/// async fn get_task(IdPath(id): IdPath<i32>) -> String {
///     format!("Task ID: {}", id)
/// }
/// ```
pub struct IdPath<T>(pub T);

impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: FromStr + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<T>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidPathParam(format!("Invalid id: {}", raw)).into_response())
    }
}
