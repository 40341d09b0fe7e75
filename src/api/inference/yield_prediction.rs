use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidatedJson, YieldPredictionResponse};
use crate::domain::YieldPredictionInput;

/// POST /predict/yield
pub async fn predict_yield(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<YieldPredictionInput>,
) -> Result<Json<YieldPredictionResponse>, ApiError> {
    debug!(crop = %input.crop, area = input.area, "Predicting yield");

    let estimate = state.yield_service.predict(&input).await?;

    Ok(Json(YieldPredictionResponse::from(estimate)))
}
