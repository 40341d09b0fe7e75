use std::time::Duration;

use thiserror::Error;

use super::model::ModelKind;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Unsupported media type: {message}")]
    UnsupportedMedia { message: String },

    #[error("Image processing failed: {message}")]
    ImageDecode { message: String },

    #[error("Failed to load {model}: {message}")]
    ModelLoad { model: ModelKind, message: String },

    #[error("Model {model} is not available ({state})")]
    ModelUnavailable { model: ModelKind, state: String },

    #[error("Prediction failed: {message}")]
    Prediction { model: ModelKind, message: String },

    #[error("Model {model} timed out after {limit:?}")]
    ModelTimeout { model: ModelKind, limit: Duration },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn unsupported_media(message: impl Into<String>) -> Self {
        Self::UnsupportedMedia {
            message: message.into(),
        }
    }

    pub fn image_decode(message: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: message.into(),
        }
    }

    pub fn model_load(model: ModelKind, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            model,
            message: message.into(),
        }
    }

    pub fn model_unavailable(model: ModelKind, state: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            model,
            state: state.into(),
        }
    }

    pub fn prediction(model: ModelKind, message: impl Into<String>) -> Self {
        Self::Prediction {
            model,
            message: message.into(),
        }
    }

    pub fn model_timeout(model: ModelKind, limit: Duration) -> Self {
        Self::ModelTimeout { model, limit }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::UnsupportedMedia { .. } | Self::ImageDecode { .. }
        )
    }
}
