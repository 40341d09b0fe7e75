//! Application state shared by every handler

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ModelRegistry;
use crate::infrastructure::image::ImageProcessor;
use crate::infrastructure::services::{
    CropRecommendationService, DiseaseDetectionService, YieldPredictionService,
};

/// Registry plus the three orchestrators built on top of it
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub crop_service: Arc<CropRecommendationService>,
    pub yield_service: Arc<YieldPredictionService>,
    pub disease_service: Arc<DiseaseDetectionService>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, inference_timeout: Duration) -> Self {
        Self::with_processor(registry, ImageProcessor::default(), inference_timeout)
    }

    pub fn with_processor(
        registry: Arc<ModelRegistry>,
        processor: ImageProcessor,
        inference_timeout: Duration,
    ) -> Self {
        Self {
            crop_service: Arc::new(CropRecommendationService::new(
                registry.clone(),
                inference_timeout,
            )),
            yield_service: Arc::new(YieldPredictionService::new(
                registry.clone(),
                inference_timeout,
            )),
            disease_service: Arc::new(DiseaseDetectionService::new(
                registry.clone(),
                processor,
                inference_timeout,
            )),
            registry,
        }
    }
}
