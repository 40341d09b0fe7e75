//! Disease detection orchestrator

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::inference::invoke;
use crate::domain::{
    DiseaseDetectionInput, DiseaseDiagnosis, DomainError, ModelKind, ModelRegistry,
};
use crate::infrastructure::image::ImageProcessor;

pub struct DiseaseDetectionService {
    registry: Arc<ModelRegistry>,
    processor: ImageProcessor,
    inference_timeout: Duration,
}

impl DiseaseDetectionService {
    pub fn new(
        registry: Arc<ModelRegistry>,
        processor: ImageProcessor,
        inference_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            processor,
            inference_timeout,
        }
    }

    /// Preprocess the upload, then diagnose it
    ///
    /// A decode failure stops before the model is touched.
    pub async fn detect(&self, input: DiseaseDetectionInput) -> Result<DiseaseDiagnosis, DomainError> {
        info!(
            file_name = input.file_name().unwrap_or("unnamed"),
            content_type = input.content_type(),
            bytes = input.data().len(),
            crop_type = input.crop_type().unwrap_or("unspecified"),
            "Disease detection requested"
        );

        let tensor = self.processor.process_async(input.data().clone()).await?;
        let model = self.registry.disease().acquire().await?;

        invoke(
            ModelKind::DiseaseDetector,
            self.inference_timeout,
            model.predict(&tensor, input.crop_type().map(str::to_string)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::domain::model::mock::registry_from;
    use crate::domain::model::{MockCropModel, MockDiseaseModel, MockYieldModel};
    use crate::domain::{Annotations, BoundingBox};
    use crate::infrastructure::image::test_images::solid_png;

    async fn service_with(disease: MockDiseaseModel) -> DiseaseDetectionService {
        let registry = registry_from(
            Arc::new(MockCropModel::new()),
            Arc::new(MockYieldModel::new()),
            Arc::new(disease),
        );
        registry.load_all().await.unwrap();

        DiseaseDetectionService::new(
            Arc::new(registry),
            ImageProcessor::default(),
            Duration::from_secs(5),
        )
    }

    fn upload(data: Vec<u8>, crop_type: Option<&str>) -> DiseaseDetectionInput {
        DiseaseDetectionInput::new(
            Some("leaf.png".to_string()),
            Some("image/png"),
            Bytes::from(data),
            crop_type.map(str::to_string),
        )
        .unwrap()
    }

    fn diagnosis() -> DiseaseDiagnosis {
        DiseaseDiagnosis {
            disease_name: "Leaf Blight".to_string(),
            severity: "Medium".to_string(),
            confidence: 0.87,
            treatment_recommendations: vec!["Apply fungicide".to_string()],
            prevention_tips: None,
            annotations: Some(Annotations {
                bounding_boxes: vec![BoundingBox {
                    x: 10,
                    y: 20,
                    width: 30,
                    height: 40,
                    label: "Leaf Blight".to_string(),
                }],
            }),
        }
    }

    #[tokio::test]
    async fn test_processed_tensor_and_hint_reach_model() {
        let mut disease = MockDiseaseModel::new();
        disease
            .expect_predict()
            .withf(|image, crop_type| {
                image.shape() == [1, 224, 224, 3] && crop_type.as_deref() == Some("tomato")
            })
            .times(1)
            .returning(|_, _| Ok(diagnosis()));

        let result = service_with(disease)
            .await
            .detect(upload(solid_png(300, 200, [90, 140, 40]), Some("tomato")))
            .await
            .unwrap();

        assert_eq!(result, diagnosis());
    }

    #[tokio::test]
    async fn test_undecodable_image_never_reaches_model() {
        let mut disease = MockDiseaseModel::new();
        disease.expect_predict().never();

        let err = service_with(disease)
            .await
            .detect(upload(b"not really a png".to_vec(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ImageDecode { .. }));
    }

    #[tokio::test]
    async fn test_model_failure_is_prediction_error() {
        let mut disease = MockDiseaseModel::new();
        disease
            .expect_predict()
            .returning(|_, _| Err(DomainError::internal("out of memory")));

        let err = service_with(disease)
            .await
            .detect(upload(solid_png(10, 10, [0, 0, 0]), None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Prediction { .. }));
    }
}
