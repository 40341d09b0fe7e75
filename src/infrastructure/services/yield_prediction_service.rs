//! Yield prediction orchestrator

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::inference::invoke;
use crate::domain::{DomainError, ModelKind, ModelRegistry, YieldEstimate, YieldPredictionInput};

pub struct YieldPredictionService {
    registry: Arc<ModelRegistry>,
    inference_timeout: Duration,
}

impl YieldPredictionService {
    pub fn new(registry: Arc<ModelRegistry>, inference_timeout: Duration) -> Self {
        Self {
            registry,
            inference_timeout,
        }
    }

    /// Forward the request to the yield model
    ///
    /// Estimates with non-finite numbers are rejected as prediction failures.
    pub async fn predict(&self, input: &YieldPredictionInput) -> Result<YieldEstimate, DomainError> {
        info!(
            crop = %input.crop,
            area = input.area,
            seasons = input.past_yields.len(),
            "Yield prediction requested"
        );

        let model = self.registry.yield_model().acquire().await?;
        let features = input.features();

        let estimate = invoke(
            ModelKind::YieldPredictor,
            self.inference_timeout,
            model.predict(&features),
        )
        .await?;

        if !estimate.is_finite() {
            return Err(DomainError::prediction(
                ModelKind::YieldPredictor,
                "model returned a non-finite estimate",
            ));
        }

        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::model::mock::registry_from;
    use crate::domain::model::{MockCropModel, MockDiseaseModel, MockYieldModel};

    fn input() -> YieldPredictionInput {
        serde_json::from_value(serde_json::json!({
            "crop": " rice ", "area": 2.0, "avg_rainfall": 120.0,
            "pesticide_usage": 4.0, "temperature": 26.0, "past_yields": [4.0, 4.4]
        }))
        .unwrap()
    }

    async fn service_with(yield_model: MockYieldModel, timeout: Duration) -> YieldPredictionService {
        let registry = registry_from(
            Arc::new(MockCropModel::new()),
            Arc::new(yield_model),
            Arc::new(MockDiseaseModel::new()),
        );
        registry.load_all().await.unwrap();

        YieldPredictionService::new(Arc::new(registry), timeout)
    }

    fn estimate() -> YieldEstimate {
        YieldEstimate {
            predicted_yield: 8.1,
            confidence_interval: [6.9, 9.3],
            confidence: 0.84,
            factors: Some(BTreeMap::from([("rainfall".to_string(), 0.3)])),
            unit: "tonnes".to_string(),
        }
    }

    #[tokio::test]
    async fn test_forwards_features_and_returns_estimate() {
        let mut yield_model = MockYieldModel::new();
        yield_model
            .expect_predict()
            .withf(|features| {
                features.crop == "rice"
                    && features.avg_rainfall == 120.0
                    && features.pesticide_usage == 4.0
                    && features.past_yields == [4.0, 4.4]
            })
            .times(1)
            .returning(|_| Ok(estimate()));

        let result = service_with(yield_model, Duration::from_secs(5))
            .await
            .predict(&input())
            .await
            .unwrap();

        assert_eq!(result, estimate());
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        struct SlowYield;

        #[async_trait::async_trait]
        impl crate::domain::YieldModel for SlowYield {
            async fn predict(
                &self,
                _features: &crate::domain::YieldFeatures,
            ) -> Result<YieldEstimate, DomainError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(estimate())
            }
        }

        let registry = registry_from(
            Arc::new(MockCropModel::new()),
            Arc::new(SlowYield),
            Arc::new(MockDiseaseModel::new()),
        );
        registry.load_all().await.unwrap();
        let service = YieldPredictionService::new(Arc::new(registry), Duration::from_millis(20));

        let err = service.predict(&input()).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::ModelTimeout {
                model: ModelKind::YieldPredictor,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_model_error_surfaces_message() {
        let mut yield_model = MockYieldModel::new();
        yield_model.expect_predict().returning(|_| {
            Err(DomainError::prediction(
                ModelKind::YieldPredictor,
                "unknown crop encoding",
            ))
        });

        let err = service_with(yield_model, Duration::from_secs(5))
            .await
            .predict(&input())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Prediction failed: unknown crop encoding");
    }

    #[tokio::test]
    async fn test_non_finite_estimate_is_prediction_error() {
        let mut yield_model = MockYieldModel::new();
        yield_model.expect_predict().returning(|_| {
            Ok(YieldEstimate {
                predicted_yield: f64::INFINITY,
                ..estimate()
            })
        });

        let err = service_with(yield_model, Duration::from_secs(5))
            .await
            .predict(&input())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Prediction { .. }));
        assert!(err.to_string().contains("non-finite"));
    }
}
