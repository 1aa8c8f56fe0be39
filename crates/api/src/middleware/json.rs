//! JSON body extractor that sanitizes and validates before the handler runs.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use reeltrack_core::error::CoreError;
use reeltrack_core::sanitize::Sanitize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// A request body that has been deserialized, sanitized and validated.
///
/// Sanitization runs first, so a field made only of markup is reported as
/// blank. Shape errors (missing fields, wrong types) become
/// `VALIDATION_ERROR`; anything else about the body is `BAD_REQUEST`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Sanitize + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.sanitize();
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Map axum's JSON rejection onto the API error envelope.
pub fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::Core(CoreError::Validation(e.body_text())),
        other => AppError::BadRequest(other.body_text()),
    }
}
