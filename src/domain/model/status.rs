use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The three inference capabilities served by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    CropRecommender,
    YieldPredictor,
    DiseaseDetector,
}

impl ModelKind {
    /// Load order used by `ModelRegistry::load_all`
    pub const ALL: [ModelKind; 3] = [
        ModelKind::CropRecommender,
        ModelKind::YieldPredictor,
        ModelKind::DiseaseDetector,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CropRecommender => "crop_recommender",
            Self::YieldPredictor => "yield_predictor",
            Self::DiseaseDetector => "disease_detector",
        }
    }
}

impl FromStr for ModelKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation_field(
                    "model",
                    format!(
                        "Unknown model '{}'; expected one of crop_recommender, yield_predictor, disease_detector",
                        s
                    ),
                )
            })
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a single model slot
///
/// `Unloaded -> Loading -> Ready`, `Ready -> Loading` on reload and
/// `Loading -> Failed` on a load error. `Failed` only leaves through reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Point-in-time view of one model slot
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub state: ModelState,
    pub model_path: String,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of every model in the registry, keyed by model name
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStatus {
    pub crop_recommender: ModelStatus,
    pub yield_predictor: ModelStatus,
    pub disease_detector: ModelStatus,
}

impl RegistryStatus {
    pub fn get(&self, kind: ModelKind) -> &ModelStatus {
        match kind {
            ModelKind::CropRecommender => &self.crop_recommender,
            ModelKind::YieldPredictor => &self.yield_predictor,
            ModelKind::DiseaseDetector => &self.disease_detector,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelKind, &ModelStatus)> {
        ModelKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn all_loaded(&self) -> bool {
        self.iter().all(|(_, status)| status.loaded)
    }

    pub fn any_loaded(&self) -> bool {
        self.iter().any(|(_, status)| status.loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parses_wire_names() {
        assert_eq!("yield_predictor".parse::<ModelKind>().unwrap(), ModelKind::YieldPredictor);

        match "bogus".parse::<ModelKind>().unwrap_err() {
            DomainError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("model"));
                assert!(message.contains("bogus"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn status(loaded: bool) -> ModelStatus {
        ModelStatus {
            loaded,
            state: if loaded {
                ModelState::Ready
            } else {
                ModelState::Failed
            },
            model_path: "models/test.json".to_string(),
            last_updated: None,
            error: None,
        }
    }

    #[test]
    fn test_model_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ModelKind::CropRecommender).unwrap(),
            "\"crop_recommender\""
        );
        let kind: ModelKind = serde_json::from_str("\"disease_detector\"").unwrap();
        assert_eq!(kind, ModelKind::DiseaseDetector);
    }

    #[test]
    fn test_registry_status_aggregates() {
        let partial = RegistryStatus {
            crop_recommender: status(true),
            yield_predictor: status(false),
            disease_detector: status(true),
        };
        assert!(!partial.all_loaded());
        assert!(partial.any_loaded());

        let json = serde_json::to_value(&partial).unwrap();
        assert_eq!(json["yield_predictor"]["loaded"], false);
        assert_eq!(json["yield_predictor"]["state"], "failed");
        assert_eq!(json["crop_recommender"]["model_path"], "models/test.json");
        assert!(json["crop_recommender"].get("error").is_none());
    }
}
