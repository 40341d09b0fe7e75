//! Crop recommendation - request, model context and response shaping rules

mod entity;
mod recommendation;

pub use entity::{CropCandidate, CropContext, CropRecommendationInput, SoilFeatures};
pub use recommendation::{
    format_yield_estimate, select_reasons, CropRecommendation, ProfitPotential,
    RecommendationItem, FALLBACK_REASONS, HIGH_PROFIT_THRESHOLD, MAX_RECOMMENDATIONS,
};
