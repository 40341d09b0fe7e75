//! Infrastructure services - inference orchestrators

mod crop_recommendation_service;
mod disease_detection_service;
mod inference;
mod yield_prediction_service;

pub use crop_recommendation_service::CropRecommendationService;
pub use disease_detection_service::DiseaseDetectionService;
pub use inference::invoke;
pub use yield_prediction_service::YieldPredictionService;
