//! Domain layer - Core business logic and entities

pub mod crop;
pub mod disease;
pub mod error;
pub mod image;
pub mod model;
pub mod yield_prediction;

pub use crop::{CropCandidate, CropContext, CropRecommendation, CropRecommendationInput, SoilFeatures};
pub use disease::{Annotations, BoundingBox, DiseaseDetectionInput, DiseaseDiagnosis};
pub use error::DomainError;
pub use image::ImageTensor;
pub use model::{
    CropModel, DiseaseModel, ModelKind, ModelLoader, ModelRegistry, ModelSlot, ModelState,
    ModelStatus, RegistryStatus, YieldModel,
};
pub use yield_prediction::{YieldEstimate, YieldFeatures, YieldPredictionInput};
