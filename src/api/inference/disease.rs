use axum::extract::State;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::multipart::read_error;
use crate::api::types::{ApiError, DiseaseDetectionResponse, Json, Multipart, Query};
use crate::domain::disease::ensure_image_content_type;
use crate::domain::{DiseaseDetectionInput, DomainError};

const FILE_FIELD: &str = "file";
const CROP_TYPE_FIELD: &str = "crop_type";

#[derive(Debug, Default, Deserialize)]
pub struct DetectQuery {
    pub crop_type: Option<String>,
}

/// The `file` part of the upload
struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /detect/disease
///
/// Multipart form with a `file` image part and an optional `crop_type` text
/// part. `?crop_type=` is used when the form does not carry one.
pub async fn detect_disease(
    State(state): State<AppState>,
    Query(query): Query<DetectQuery>,
    mut multipart: Multipart,
) -> Result<Json<DiseaseDetectionResponse>, ApiError> {
    let mut upload = None;
    let mut form_crop_type = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);

                // Checked before the body is buffered
                ensure_image_content_type(content_type.as_deref())?;

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| read_error("Failed to read uploaded file", e))?;

                upload = Some(Upload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some(CROP_TYPE_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| read_error("Failed to read crop_type", e))?;
                form_crop_type = Some(value);
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let upload = upload.ok_or_else(|| {
        DomainError::validation_field(FILE_FIELD, "An image file is required in the 'file' field")
    })?;

    let input = DiseaseDetectionInput::new(
        upload.file_name,
        upload.content_type.as_deref(),
        upload.data,
        form_crop_type.or(query.crop_type),
    )?;

    let diagnosis = state.disease_service.detect(input).await?;

    Ok(Json(DiseaseDetectionResponse::from(diagnosis)))
}
