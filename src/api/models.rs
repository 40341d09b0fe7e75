//! Model lifecycle endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query, ReloadResponse};
use crate::domain::{DomainError, ModelKind, RegistryStatus};
use crate::infrastructure::observability::record_registry_status;

pub fn create_models_router() -> Router<AppState> {
    Router::new()
        .route("/models/status", get(models_status))
        .route("/models/reload", post(reload_models))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReloadQuery {
    pub model: Option<String>,
}

impl ReloadQuery {
    fn kind(&self) -> Result<Option<ModelKind>, DomainError> {
        self.model.as_deref().map(str::parse).transpose()
    }
}

/// GET /models/status
pub async fn models_status(State(state): State<AppState>) -> Json<RegistryStatus> {
    Json(state.registry.status().await)
}

/// POST /models/reload
///
/// Reloads every model, or only `?model=<name>`. Load failures surface as 500
/// after every requested model has been attempted.
pub async fn reload_models(
    State(state): State<AppState>,
    Query(query): Query<ReloadQuery>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let kind = query.kind()?;
    info!(model = ?kind, "Reloading models");

    let result = state.registry.reload(kind).await;
    let status = state.registry.status().await;
    record_registry_status(&status);

    if let Err(e) = result {
        error!(error = %e, "Model reload failed");
        return Err(ApiError::internal(format!("Failed to reload models: {}", e))
            .with_code("model_load_error"));
    }

    let message = match kind {
        Some(kind) => format!("Model {} reloaded successfully", kind),
        None => "All models reloaded successfully".to_string(),
    };

    Ok(Json(ReloadResponse {
        message,
        models: status,
    }))
}
