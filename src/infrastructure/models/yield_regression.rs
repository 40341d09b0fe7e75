//! Yield predictor backed by a per-crop linear adjustment model

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::artifact::read_artifact;
use crate::domain::{
    DomainError, ModelKind, ModelLoader, YieldEstimate, YieldFeatures, YieldModel,
};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CropBaseline {
    /// Yield per hectare under reference conditions
    pub base_yield: f64,
    pub optimal_temperature: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coefficients {
    pub rainfall: f64,
    pub pesticide: f64,
    pub temperature: f64,
    #[serde(default)]
    pub nutrients: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YieldRegressionArtifact {
    pub version: String,
    pub unit: String,
    pub default_crop: CropBaseline,
    #[serde(default)]
    pub crops: HashMap<String, CropBaseline>,
    pub coefficients: Coefficients,
    /// Mean N/P/K level at which the nutrient term is zero
    #[serde(default = "default_nutrient_reference")]
    pub nutrient_reference: f64,
    /// Share of the prediction taken from the historical mean
    pub history_weight: f64,
    pub interval_ratio: f64,
    pub base_confidence: f64,
    /// Confidence gained per past season supplied
    pub confidence_per_season: f64,
    pub max_confidence: f64,
}

fn default_nutrient_reference() -> f64 {
    50.0
}

pub struct YieldRegressionModel {
    artifact: YieldRegressionArtifact,
}

impl YieldRegressionModel {
    pub fn new(artifact: YieldRegressionArtifact) -> Result<Self, DomainError> {
        let fail = |message: &str| Err(DomainError::model_load(ModelKind::YieldPredictor, message));

        if !(0.0..=1.0).contains(&artifact.history_weight) {
            return fail("history_weight must lie in [0, 1]");
        }
        if !(0.0..1.0).contains(&artifact.interval_ratio) {
            return fail("interval_ratio must lie in [0, 1)");
        }
        if artifact.max_confidence > 0.95 || artifact.base_confidence > artifact.max_confidence {
            return fail("confidence bounds must satisfy base <= max <= 0.95");
        }

        Ok(Self { artifact })
    }

    fn baseline(&self, crop: &str) -> CropBaseline {
        self.artifact
            .crops
            .get(&crop.to_ascii_lowercase())
            .copied()
            .unwrap_or(self.artifact.default_crop)
    }
}

#[async_trait]
impl YieldModel for YieldRegressionModel {
    async fn predict(&self, features: &YieldFeatures) -> Result<YieldEstimate, DomainError> {
        if features.area <= 0.0 {
            return Err(DomainError::prediction(
                ModelKind::YieldPredictor,
                "area must be positive",
            ));
        }

        let a = &self.artifact;
        let c = a.coefficients;
        let baseline = self.baseline(&features.crop);

        let rainfall_term = features.avg_rainfall * c.rainfall;
        let pesticide_term = -features.pesticide_usage * c.pesticide;
        let temperature_term =
            -(features.temperature - baseline.optimal_temperature).abs() * c.temperature;
        let nutrient_term = features
            .mean_nutrients()
            .map(|mean| (mean - a.nutrient_reference) * c.nutrients)
            .unwrap_or(0.0);

        let multiplier = 1.0 + rainfall_term + pesticide_term + temperature_term + nutrient_term;
        let per_hectare = (baseline.base_yield * multiplier).max(0.0);
        let modelled = per_hectare * features.area;

        let base_total = baseline.base_yield * features.area;
        let mut factors = BTreeMap::from([
            ("base".to_string(), base_total),
            ("rainfall".to_string(), base_total * rainfall_term),
            ("pesticide".to_string(), base_total * pesticide_term),
            ("temperature".to_string(), base_total * temperature_term),
        ]);
        if features.mean_nutrients().is_some() {
            factors.insert("nutrients".to_string(), base_total * nutrient_term);
        }

        let predicted = if features.past_yields.is_empty() {
            modelled
        } else {
            let history_mean =
                features.past_yields.iter().sum::<f64>() / features.past_yields.len() as f64;
            let blended = (1.0 - a.history_weight) * modelled + a.history_weight * history_mean;
            factors.insert("history".to_string(), blended - modelled);
            blended
        };

        let confidence = (a.base_confidence
            + a.confidence_per_season * features.past_yields.len() as f64)
            .min(a.max_confidence);

        let estimate = YieldEstimate {
            predicted_yield: predicted,
            confidence_interval: [
                (predicted * (1.0 - a.interval_ratio)).max(0.0),
                predicted * (1.0 + a.interval_ratio),
            ],
            confidence,
            factors: Some(factors),
            unit: a.unit.clone(),
        };

        if !estimate.is_finite() {
            return Err(DomainError::prediction(
                ModelKind::YieldPredictor,
                "inputs are out of the model's numeric range",
            ));
        }

        Ok(estimate)
    }
}

pub struct YieldRegressionLoader;

#[async_trait]
impl ModelLoader<dyn YieldModel> for YieldRegressionLoader {
    async fn load(&self, path: &Path) -> Result<Arc<dyn YieldModel>, DomainError> {
        let artifact: YieldRegressionArtifact =
            read_artifact(ModelKind::YieldPredictor, path).await?;
        let model = YieldRegressionModel::new(artifact)?;

        Ok(Arc::new(model))
    }
}
