//! Liveness, readiness and model lifecycle bodies

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::RegistryStatus;

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Overall readiness derived from how many models are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn from_registry(status: &RegistryStatus) -> Self {
        if status.all_loaded() {
            Self::Healthy
        } else if status.any_loaded() {
            Self::Degraded
        } else {
            Self::Unhealthy
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsLoaded {
    pub crop_recommender: bool,
    pub yield_predictor: bool,
    pub disease_detector: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub models: ModelsLoaded,
    pub timestamp: DateTime<Utc>,
}

impl From<&RegistryStatus> for HealthResponse {
    fn from(status: &RegistryStatus) -> Self {
        Self {
            status: HealthStatus::from_registry(status),
            models: ModelsLoaded {
                crop_recommender: status.crop_recommender.loaded,
                yield_predictor: status.yield_predictor.loaded,
                disease_detector: status.disease_detector.loaded,
            },
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub models: RegistryStatus,
}
