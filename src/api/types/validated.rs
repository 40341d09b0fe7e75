//! JSON extractor that also enforces `validator` rules

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::error::ApiError;
use super::json::Json;
use crate::domain::DomainError;

/// A deserialized body whose field constraints have already been checked
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        value
            .validate()
            .map_err(|errors| ApiError::from(validation_error(&errors)).into_response())?;

        Ok(Self(value))
    }
}

/// First failing field, in name order, as a domain validation error
pub fn validation_error(errors: &ValidationErrors) -> DomainError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields
        .first()
        .and_then(|(field, errs)| errs.first().map(|e| (field, e)))
    {
        Some((field, error)) => {
            DomainError::validation_field(field.to_string(), describe(field, error))
        }
        None => DomainError::validation("Request failed validation"),
    }
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("{}: {}", field, message);
    }

    let bound = |key: &str| error.params.get(key).map(|v| v.to_string());

    match (&*error.code, bound("min"), bound("max")) {
        ("range", Some(min), Some(max)) => {
            format!("{} must be between {} and {}", field, min, max)
        }
        ("range", Some(min), None) => format!("{} must be at least {}", field, min),
        ("range", None, Some(max)) => format!("{} must be at most {}", field, max),
        ("range", None, None) => match bound("exclusive_min") {
            Some(min) => format!("{} must be greater than {}", field, min),
            None => format!("{} is out of range", field),
        },
        (code, _, _) => format!("{} is invalid ({})", field, code),
    }
}
