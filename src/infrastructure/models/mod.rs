//! Artifact-backed model implementations and their loaders

mod artifact;
mod crop_profile;
mod disease_signature;
mod factory;
mod yield_regression;

pub use artifact::read_artifact;
pub use crop_profile::{CropProfileArtifact, CropProfileLoader, CropProfileModel};
pub use disease_signature::{DiseaseSignatureArtifact, DiseaseSignatureLoader, DiseaseSignatureModel};
pub use factory::create_model_registry;
pub use yield_regression::{YieldRegressionArtifact, YieldRegressionLoader, YieldRegressionModel};
