use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CropRecommendationResponse, Json, ValidatedJson};
use crate::domain::CropRecommendationInput;

/// POST /recommend/crop
pub async fn recommend_crop(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CropRecommendationInput>,
) -> Result<Json<CropRecommendationResponse>, ApiError> {
    debug!(features = ?input.features(), "Recommending crops");

    let result = state.crop_service.recommend(&input).await?;

    Ok(Json(CropRecommendationResponse::from(result)))
}
