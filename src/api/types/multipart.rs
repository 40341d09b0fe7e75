//! Multipart extractor whose rejections use the API error body

use axum::extract::{
    multipart::{Field, MultipartError},
    FromRequest, Multipart as AxumMultipart, Request,
};
use axum::http::StatusCode;

use super::error::{ApiError, ApiErrorType};

/// `axum::extract::Multipart` with rejections rendered as `ApiErrorResponse`
#[derive(Debug)]
pub struct Multipart(AxumMultipart);

impl Multipart {
    /// Next form part, with read failures mapped to API errors
    pub async fn next_field(&mut self) -> Result<Option<Field<'_>>, ApiError> {
        self.0
            .next_field()
            .await
            .map_err(|e| read_error("Failed to read multipart field", e))
    }
}

impl<S> FromRequest<S> for Multipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumMultipart::from_request(req, state)
            .await
            .map(Multipart)
            .map_err(|rejection| {
                ApiError::new(
                    rejection.status(),
                    ApiErrorType::InvalidRequestError,
                    rejection.body_text(),
                )
                .with_code("unsupported_media_type")
            })
    }
}

/// Map a multipart read failure, keeping 413 for bodies over the upload limit
pub fn read_error(context: &str, err: MultipartError) -> ApiError {
    let message = format!("{}: {}", context, err.body_text());

    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(message)
    } else {
        ApiError::bad_request(message).with_code("invalid_multipart")
    }
}
