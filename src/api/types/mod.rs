//! Request extractors and response bodies of the HTTP API

pub mod error;
pub mod inference;
pub mod json;
pub mod multipart;
pub mod query;
pub mod status;
pub mod validated;

pub use error::{ApiError, ApiErrorResponse};
pub use inference::{
    CropRecommendationResponse, DiseaseDetectionResponse, YieldPredictionResponse,
};
pub use json::Json;
pub use multipart::Multipart;
pub use query::Query;
pub use status::{HealthResponse, HealthStatus, ReloadResponse, RootResponse};
pub use validated::ValidatedJson;
