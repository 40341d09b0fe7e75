//! Response bodies of the three inference endpoints

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::crop::RecommendationItem;
use crate::domain::{Annotations, CropRecommendation, DiseaseDiagnosis, YieldEstimate};

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationMetadata {
    pub timestamp: DateTime<Utc>,
    pub model_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CropRecommendationResponse {
    pub success: bool,
    pub recommendations: Vec<RecommendationItem>,
    pub reasons: Vec<String>,
    pub metadata: RecommendationMetadata,
}

impl From<CropRecommendation> for CropRecommendationResponse {
    fn from(result: CropRecommendation) -> Self {
        Self {
            success: true,
            recommendations: result.recommendations,
            reasons: result.reasons,
            metadata: RecommendationMetadata {
                timestamp: Utc::now(),
                model_version: result.model_version,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YieldPredictionResponse {
    pub success: bool,
    pub predicted_yield: f64,
    pub unit: String,
    pub confidence_interval: [f64; 2],
    pub confidence: f64,
    pub factors: BTreeMap<String, f64>,
    pub timestamp: DateTime<Utc>,
}

impl From<YieldEstimate> for YieldPredictionResponse {
    fn from(estimate: YieldEstimate) -> Self {
        Self {
            success: true,
            predicted_yield: estimate.predicted_yield,
            unit: estimate.unit,
            confidence_interval: estimate.confidence_interval,
            confidence: estimate.confidence,
            factors: estimate.factors.unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiseaseDetectionResponse {
    pub success: bool,
    pub disease_name: String,
    pub severity: String,
    pub confidence: f64,
    pub treatment_recommendations: Vec<String>,
    pub prevention_tips: Vec<String>,
    pub annotations: Option<Annotations>,
    pub timestamp: DateTime<Utc>,
}

impl From<DiseaseDiagnosis> for DiseaseDetectionResponse {
    fn from(diagnosis: DiseaseDiagnosis) -> Self {
        Self {
            success: true,
            disease_name: diagnosis.disease_name,
            severity: diagnosis.severity,
            confidence: diagnosis.confidence,
            treatment_recommendations: diagnosis.treatment_recommendations,
            prevention_tips: diagnosis.prevention_tips.unwrap_or_default(),
            annotations: diagnosis.annotations,
            timestamp: Utc::now(),
        }
    }
}
