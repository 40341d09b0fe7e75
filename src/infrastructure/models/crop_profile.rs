//! Crop recommender backed by per-crop ideal growing ranges

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::artifact::read_artifact;
use crate::domain::{
    CropCandidate, CropContext, CropModel, DomainError, ModelKind, ModelLoader, SoilFeatures,
};

/// Inclusive ideal range for a single feature
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
}

impl IdealRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// 1 inside the range, decaying exponentially with the distance outside
    /// it measured in range widths
    pub fn score(&self, value: f64) -> f64 {
        if self.contains(value) {
            return 1.0;
        }

        let distance = if value < self.min {
            self.min - value
        } else {
            value - self.max
        };
        let width = (self.max - self.min).max(f64::EPSILON);

        (-distance / width).exp()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureRanges {
    #[serde(rename = "N")]
    pub n: IdealRange,
    #[serde(rename = "P")]
    pub p: IdealRange,
    #[serde(rename = "K")]
    pub k: IdealRange,
    #[serde(rename = "pH")]
    pub ph: IdealRange,
    pub temperature: IdealRange,
    pub humidity: IdealRange,
    pub rainfall: IdealRange,
}

impl FeatureRanges {
    fn labelled(&self) -> [(&'static str, &IdealRange); 7] {
        [
            ("Nitrogen", &self.n),
            ("Phosphorus", &self.p),
            ("Potassium", &self.k),
            ("Soil pH", &self.ph),
            ("Temperature", &self.temperature),
            ("Humidity", &self.humidity),
            ("Rainfall", &self.rainfall),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CropProfile {
    pub name: String,
    pub ranges: FeatureRanges,
    /// Quintals per acre under neutral irrigation
    pub base_yield: f64,
    pub profit_per_hectare: f64,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub water_need: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CropProfileArtifact {
    pub version: String,
    #[serde(default)]
    pub season_bonus: f64,
    #[serde(default)]
    pub market_demand: HashMap<String, f64>,
    #[serde(default)]
    pub irrigation: HashMap<String, f64>,
    pub crops: Vec<CropProfile>,
}

pub struct CropProfileModel {
    artifact: CropProfileArtifact,
}

impl CropProfileModel {
    pub fn new(artifact: CropProfileArtifact) -> Result<Self, DomainError> {
        if artifact.crops.is_empty() {
            return Err(DomainError::model_load(
                ModelKind::CropRecommender,
                "artifact lists no crops",
            ));
        }

        for crop in &artifact.crops {
            if let Some((label, _)) = crop
                .ranges
                .labelled()
                .into_iter()
                .find(|(_, range)| range.min > range.max)
            {
                return Err(DomainError::model_load(
                    ModelKind::CropRecommender,
                    format!("{} range for {} is inverted", label, crop.name),
                ));
            }
        }

        Ok(Self { artifact })
    }

    fn candidate(&self, profile: &CropProfile, features: &SoilFeatures, context: &CropContext) -> CropCandidate {
        let scored: Vec<(&'static str, bool, f64)> = profile
            .ranges
            .labelled()
            .into_iter()
            .zip(features.as_array())
            .map(|((label, range), value)| (label, range.contains(value), range.score(value)))
            .collect();

        let mean_score = scored.iter().map(|(_, _, s)| s).sum::<f64>() / scored.len() as f64;

        let season_bonus = if profile
            .seasons
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&context.season))
        {
            self.artifact.season_bonus
        } else {
            0.0
        };
        let demand = self.multiplier(&self.artifact.market_demand, &context.market_demand);
        let confidence = ((mean_score + season_bonus) * demand).clamp(0.0, 1.0);

        let irrigation = self.multiplier(&self.artifact.irrigation, &context.irrigation_method);
        let expected_yield = profile.base_yield * irrigation;
        let expected_profit = profile.profit_per_hectare * context.area_hectares * confidence;

        let reasons: Vec<String> = scored
            .iter()
            .filter(|(_, inside, _)| *inside)
            .map(|(label, _, _)| match (*label, &profile.water_need) {
                ("Rainfall", Some(need)) => {
                    format!("Rainfall suits the {} water need of {}", need, profile.name)
                }
                _ => format!("{} is within the ideal range for {}", label, profile.name),
            })
            .collect();

        let candidate = CropCandidate::new(profile.name.clone(), confidence)
            .with_expected_yield(expected_yield)
            .with_expected_profit(expected_profit);

        if reasons.is_empty() {
            candidate
        } else {
            candidate.with_reasons(reasons)
        }
    }

    fn multiplier(&self, table: &HashMap<String, f64>, key: &str) -> f64 {
        table.get(&key.to_ascii_lowercase()).copied().unwrap_or(1.0)
    }
}

#[async_trait]
impl CropModel for CropProfileModel {
    async fn predict(
        &self,
        features: &SoilFeatures,
        context: &CropContext,
    ) -> Result<Vec<CropCandidate>, DomainError> {
        if features.as_array().iter().any(|v| !v.is_finite()) {
            return Err(DomainError::prediction(
                ModelKind::CropRecommender,
                "features must be finite numbers",
            ));
        }

        let mut candidates: Vec<CropCandidate> = self
            .artifact
            .crops
            .iter()
            .map(|profile| self.candidate(profile, features, context))
            .collect();

        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(candidates)
    }

    fn version(&self) -> String {
        self.artifact.version.clone()
    }
}

pub struct CropProfileLoader;

#[async_trait]
impl ModelLoader<dyn CropModel> for CropProfileLoader {
    async fn load(&self, path: &Path) -> Result<Arc<dyn CropModel>, DomainError> {
        let artifact: CropProfileArtifact = read_artifact(ModelKind::CropRecommender, path).await?;
        let model = CropProfileModel::new(artifact)?;

        Ok(Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::super::artifact::fixtures::{shipped, temp_artifact};
    use super::*;

    fn range(min: f64, max: f64) -> IdealRange {
        IdealRange { min, max }
    }

    fn profile(name: &str, rainfall: IdealRange, profit: f64) -> CropProfile {
        CropProfile {
            name: name.to_string(),
            ranges: FeatureRanges {
                n: range(40.0, 60.0),
                p: range(40.0, 60.0),
                k: range(40.0, 60.0),
                ph: range(6.0, 7.0),
                temperature: range(20.0, 30.0),
                humidity: range(50.0, 70.0),
                rainfall,
            },
            base_yield: 20.0,
            profit_per_hectare: profit,
            seasons: vec!["monsoon".to_string()],
            water_need: None,
        }
    }

    fn features() -> SoilFeatures {
        SoilFeatures {
            n: 50.0,
            p: 50.0,
            k: 50.0,
            ph: 6.5,
            temperature: 25.0,
            humidity: 60.0,
            rainfall: 100.0,
        }
    }

    #[test]
    fn test_range_score() {
        let r = range(10.0, 20.0);

        assert_eq!(r.score(15.0), 1.0);
        assert_eq!(r.score(10.0), 1.0);
        assert!((r.score(30.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert!(r.score(0.0) < 1.0);
        assert!(r.score(-100.0) < r.score(0.0));
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let mut bad = profile("rice", range(10.0, 20.0), 1.0);
        bad.ranges.ph = range(8.0, 6.0);

        let result = CropProfileModel::new(CropProfileArtifact {
            version: "1".to_string(),
            season_bonus: 0.0,
            market_demand: HashMap::new(),
            irrigation: HashMap::new(),
            crops: vec![bad],
        });

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ranks_best_match_first_with_reasons() {
        let model = CropProfileModel::new(CropProfileArtifact {
            version: "test".to_string(),
            season_bonus: 0.0,
            market_demand: HashMap::new(),
            irrigation: HashMap::from([("drip".to_string(), 1.5)]),
            crops: vec![
                profile("millet", range(300.0, 400.0), 5_000.0),
                profile("maize", range(80.0, 120.0), 30_000.0),
            ],
        })
        .unwrap();

        let candidates = model
            .predict(&features(), &CropContext::default())
            .await
            .unwrap();

        assert_eq!(candidates[0].crop, "maize");
        assert_eq!(candidates[0].confidence, 1.0);
        assert_eq!(candidates[0].expected_yield, Some(30.0));
        assert_eq!(candidates[0].expected_profit, Some(30_000.0));
        assert_eq!(candidates[0].reasons.as_ref().map(Vec::len), Some(7));

        assert_eq!(candidates[1].crop, "millet");
        assert!(candidates[1].confidence < 1.0);
        assert_eq!(model.version(), "test");
    }

    #[tokio::test]
    async fn test_reasons_absent_when_nothing_in_range() {
        let mut far = profile("cranberry", range(400.0, 500.0), 1.0);
        far.ranges = FeatureRanges {
            n: range(90.0, 100.0),
            p: range(90.0, 100.0),
            k: range(90.0, 100.0),
            ph: range(3.0, 4.0),
            temperature: range(40.0, 45.0),
            humidity: range(90.0, 100.0),
            rainfall: range(400.0, 500.0),
        };
        let model = CropProfileModel::new(CropProfileArtifact {
            version: "test".to_string(),
            season_bonus: 0.0,
            market_demand: HashMap::new(),
            irrigation: HashMap::new(),
            crops: vec![far],
        })
        .unwrap();

        let candidates = model
            .predict(&features(), &CropContext::default())
            .await
            .unwrap();

        assert!(candidates[0].reasons.is_none());
    }

    #[tokio::test]
    async fn test_season_bonus_and_demand_clamped() {
        let model = CropProfileModel::new(CropProfileArtifact {
            version: "test".to_string(),
            season_bonus: 0.5,
            market_demand: HashMap::from([("high".to_string(), 2.0)]),
            irrigation: HashMap::new(),
            crops: vec![profile("maize", range(80.0, 120.0), 1.0)],
        })
        .unwrap();

        let candidates = model
            .predict(&features(), &CropContext::default())
            .await
            .unwrap();

        assert_eq!(candidates[0].confidence, 1.0);
    }

    #[tokio::test]
    async fn test_shipped_artifact_loads_and_ranks() {
        let model = CropProfileLoader
            .load(&shipped("crop_recommender.json"))
            .await
            .unwrap();

        let candidates = model
            .predict(&features(), &CropContext::default())
            .await
            .unwrap();

        assert!(candidates.len() > 5);
        assert!(candidates
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence));
        assert!(candidates
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.confidence)));
    }

    #[tokio::test]
    async fn test_loader_rejects_empty_crop_list() {
        let path = temp_artifact(r#"{"version": "1.0.0", "crops": []}"#);

        let err = CropProfileLoader.load(&path).await.err().unwrap();

        assert!(err.to_string().contains("no crops"));
    }
}
