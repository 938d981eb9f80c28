//! JSON body extractor that reports rejections as [`AppError::BadRequest`].

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON extractor whose rejections go through the application error body.
///
/// Field rules are not checked here; submissions are validated by
/// [`crate::validation::UserValidator`] once the body has been decoded.
///
/// # Example
///
/// ```rust,ignore
/// use user_admin::api::extractors::JsonBody;
/// use user_admin::validation::UserInput;
///
/// async fn store(JsonBody(input): JsonBody<UserInput>) {
///     // input decoded, not yet validated
/// }
/// ```
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        Ok(JsonBody(value))
    }
}
