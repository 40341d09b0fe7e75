use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{CropProfileLoader, DiseaseSignatureLoader, YieldRegressionLoader};
use crate::config::ModelsConfig;
use crate::domain::{
    CropModel, DiseaseModel, ModelKind, ModelLoader, ModelRegistry, ModelSlot, YieldModel,
};

/// Build a registry of artifact-backed models; nothing is loaded yet
pub fn create_model_registry(config: &ModelsConfig) -> ModelRegistry {
    let load_timeout = Duration::from_secs(config.load_timeout_secs);

    let crop_loader: Arc<dyn ModelLoader<dyn CropModel>> = Arc::new(CropProfileLoader);
    let yield_loader: Arc<dyn ModelLoader<dyn YieldModel>> = Arc::new(YieldRegressionLoader);
    let disease_loader: Arc<dyn ModelLoader<dyn DiseaseModel>> = Arc::new(DiseaseSignatureLoader);

    info!(
        crop = %config.crop_recommender_path,
        yield_model = %config.yield_predictor_path,
        disease = %config.disease_detector_path,
        "Creating model registry"
    );

    ModelRegistry::new(
        ModelSlot::new(
            ModelKind::CropRecommender,
            &config.crop_recommender_path,
            crop_loader,
        )
        .with_load_timeout(load_timeout),
        ModelSlot::new(
            ModelKind::YieldPredictor,
            &config.yield_predictor_path,
            yield_loader,
        )
        .with_load_timeout(load_timeout),
        ModelSlot::new(
            ModelKind::DiseaseDetector,
            &config.disease_detector_path,
            disease_loader,
        )
        .with_load_timeout(load_timeout),
    )
}
