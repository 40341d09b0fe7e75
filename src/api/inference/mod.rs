//! Inference endpoints

mod crop;
mod disease;
mod yield_prediction;

use axum::{routing::post, Router};

use super::state::AppState;

pub use crop::recommend_crop;
pub use disease::detect_disease;
pub use yield_prediction::predict_yield;

pub fn create_inference_router() -> Router<AppState> {
    Router::new()
        .route("/recommend/crop", post(recommend_crop))
        .route("/predict/yield", post(predict_yield))
        .route("/detect/disease", post(detect_disease))
}
