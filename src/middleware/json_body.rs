use axum::{
    Json,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AttendanceError;

/// JSON body extractor whose rejections use the standard `{success, error}` shape.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(Self(body)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "rejected request body");
                Err(AttendanceError::validation(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))
                .into_response())
            }
        }
    }
}
