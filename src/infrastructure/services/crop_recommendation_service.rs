//! Crop recommendation orchestrator

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::inference::invoke;
use crate::domain::{
    CropContext, CropRecommendation, CropRecommendationInput, DomainError, ModelKind,
    ModelRegistry,
};

pub struct CropRecommendationService {
    registry: Arc<ModelRegistry>,
    inference_timeout: Duration,
}

impl CropRecommendationService {
    pub fn new(registry: Arc<ModelRegistry>, inference_timeout: Duration) -> Self {
        Self {
            registry,
            inference_timeout,
        }
    }

    /// Rank crops for already range-checked readings
    ///
    /// The farming context is always the default one; `location` is only
    /// logged.
    pub async fn recommend(
        &self,
        input: &CropRecommendationInput,
    ) -> Result<CropRecommendation, DomainError> {
        info!(
            location = input.location.as_deref().unwrap_or("unspecified"),
            "Crop recommendation requested"
        );

        let model = self.registry.crop().acquire().await?;
        let features = input.features();
        let context = CropContext::default();

        let candidates = invoke(
            ModelKind::CropRecommender,
            self.inference_timeout,
            model.predict(&features, &context),
        )
        .await?;

        Ok(CropRecommendation::from_candidates(
            &candidates,
            model.version(),
        ))
    }
}
