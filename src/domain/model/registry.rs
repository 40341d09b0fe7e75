use tracing::{info, warn};

use super::capability::{CropModel, DiseaseModel, YieldModel};
use super::slot::ModelSlot;
use super::status::{ModelKind, RegistryStatus};
use crate::domain::DomainError;

/// Owns the three inference models and their lifecycle
///
/// Constructed once at startup and shared with request handlers through the
/// application state.
pub struct ModelRegistry {
    crop: ModelSlot<dyn CropModel>,
    yield_model: ModelSlot<dyn YieldModel>,
    disease: ModelSlot<dyn DiseaseModel>,
}

impl ModelRegistry {
    pub fn new(
        crop: ModelSlot<dyn CropModel>,
        yield_model: ModelSlot<dyn YieldModel>,
        disease: ModelSlot<dyn DiseaseModel>,
    ) -> Self {
        Self {
            crop,
            yield_model,
            disease,
        }
    }

    pub fn crop(&self) -> &ModelSlot<dyn CropModel> {
        &self.crop
    }

    pub fn yield_model(&self) -> &ModelSlot<dyn YieldModel> {
        &self.yield_model
    }

    pub fn disease(&self) -> &ModelSlot<dyn DiseaseModel> {
        &self.disease
    }

    /// Load every model in order
    ///
    /// A failure does not stop the remaining loads. The first error is
    /// returned once all three have been attempted.
    pub async fn load_all(&self) -> Result<(), DomainError> {
        let mut first_error = None;

        for kind in ModelKind::ALL {
            if let Err(e) = self.load(kind).await {
                warn!(model = %kind, "Continuing without model");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("All models loaded");
                Ok(())
            }
        }
    }

    /// Reload one model, or all of them when `kind` is `None`
    pub async fn reload(&self, kind: Option<ModelKind>) -> Result<(), DomainError> {
        match kind {
            Some(kind) => self.load(kind).await,
            None => self.load_all().await,
        }
    }

    pub async fn status(&self) -> RegistryStatus {
        RegistryStatus {
            crop_recommender: self.crop.status().await,
            yield_predictor: self.yield_model.status().await,
            disease_detector: self.disease.status().await,
        }
    }

    async fn load(&self, kind: ModelKind) -> Result<(), DomainError> {
        match kind {
            ModelKind::CropRecommender => self.crop.load().await,
            ModelKind::YieldPredictor => self.yield_model.load().await,
            ModelKind::DiseaseDetector => self.disease.load().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::model::mock::{failing, fixed, registry_from};
    use crate::domain::model::{
        MockCropModel, MockDiseaseModel, MockYieldModel, ModelLoader, ModelState,
    };

    fn mocks() -> (Arc<dyn CropModel>, Arc<dyn YieldModel>, Arc<dyn DiseaseModel>) {
        (
            Arc::new(MockCropModel::new()),
            Arc::new(MockYieldModel::new()),
            Arc::new(MockDiseaseModel::new()),
        )
    }

    #[tokio::test]
    async fn test_load_all_marks_every_model_ready() {
        let (crop, yield_model, disease) = mocks();
        let registry = registry_from(crop, yield_model, disease);

        registry.load_all().await.unwrap();

        let status = registry.status().await;
        assert!(status.all_loaded());
        for (_, model) in status.iter() {
            assert_eq!(model.state, ModelState::Ready);
        }
    }

    #[tokio::test]
    async fn test_load_all_degrades_on_single_failure() {
        let (crop, _, disease) = mocks();
        let crop_loader: Arc<dyn ModelLoader<dyn CropModel>> = Arc::new(fixed(crop));
        let yield_loader: Arc<dyn ModelLoader<dyn YieldModel>> =
            Arc::new(failing::<dyn YieldModel>("artifact missing"));
        let disease_loader: Arc<dyn ModelLoader<dyn DiseaseModel>> = Arc::new(fixed(disease));

        let registry = ModelRegistry::new(
            ModelSlot::new(ModelKind::CropRecommender, "crop.json", crop_loader),
            ModelSlot::new(ModelKind::YieldPredictor, "yield.json", yield_loader),
            ModelSlot::new(ModelKind::DiseaseDetector, "disease.json", disease_loader),
        );

        let err = registry.load_all().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::ModelLoad { model: ModelKind::YieldPredictor, .. }
        ));

        // The models after the failing one were still attempted
        let status = registry.status().await;
        assert!(status.crop_recommender.loaded);
        assert!(!status.yield_predictor.loaded);
        assert!(status.disease_detector.loaded);
        assert!(!status.all_loaded());
        assert!(registry.crop().acquire().await.is_ok());
        assert!(registry.yield_model().acquire().await.is_err());
    }

    #[tokio::test]
    async fn test_reload_single_model_leaves_others_untouched() {
        let (crop, yield_model, disease) = mocks();
        let registry = registry_from(crop, yield_model, disease);
        registry.load_all().await.unwrap();

        let before = registry.status().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        registry.reload(Some(ModelKind::DiseaseDetector)).await.unwrap();
        let after = registry.status().await;

        assert_eq!(
            before.crop_recommender.last_updated,
            after.crop_recommender.last_updated
        );
        assert!(after.disease_detector.last_updated > before.disease_detector.last_updated);
        assert!(after.disease_detector.loaded);
    }

    #[tokio::test]
    async fn test_reload_all_refreshes_timestamps() {
        let (crop, yield_model, disease) = mocks();
        let registry = registry_from(crop, yield_model, disease);
        registry.load_all().await.unwrap();
        let before = registry.status().await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        registry.reload(None).await.unwrap();
        let after = registry.status().await;

        for kind in ModelKind::ALL {
            assert!(after.get(kind).loaded);
            assert!(after.get(kind).last_updated > before.get(kind).last_updated);
        }
    }
}
