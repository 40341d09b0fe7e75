//! Capability contracts the orchestrators require of each model
//!
//! The three roles share nothing but the registry lifecycle, so each one is
//! its own trait rather than a common base.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::crop::{CropCandidate, CropContext, SoilFeatures};
use crate::domain::disease::DiseaseDiagnosis;
use crate::domain::image::ImageTensor;
use crate::domain::yield_prediction::{YieldEstimate, YieldFeatures};
use crate::domain::DomainError;

/// Ranks candidate crops for a set of soil and climate readings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CropModel: Send + Sync {
    /// Candidates ordered by confidence, best first
    async fn predict(
        &self,
        features: &SoilFeatures,
        context: &CropContext,
    ) -> Result<Vec<CropCandidate>, DomainError>;

    /// Version reported in response metadata
    fn version(&self) -> String;
}

/// Estimates the harvest for a crop on a given area
#[cfg_attr(test, automock)]
#[async_trait]
pub trait YieldModel: Send + Sync {
    async fn predict(&self, features: &YieldFeatures) -> Result<YieldEstimate, DomainError>;
}

/// Diagnoses plant disease from a preprocessed leaf image
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DiseaseModel: Send + Sync {
    async fn predict(
        &self,
        image: &ImageTensor,
        crop_type: Option<String>,
    ) -> Result<DiseaseDiagnosis, DomainError>;
}
