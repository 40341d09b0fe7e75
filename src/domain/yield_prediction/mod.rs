//! Yield prediction - request, model features and estimate

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Harvest history and growing conditions submitted for a yield estimate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct YieldPredictionInput {
    #[validate(length(min = 1, message = "crop must not be empty"))]
    pub crop: String,

    /// Hectares
    #[validate(range(exclusive_min = 0.0))]
    pub area: f64,

    /// Average rainfall in millimetres
    #[serde(alias = "avg_rainfall")]
    #[validate(range(min = 0.0))]
    pub rainfall: f64,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub pesticide_usage: f64,

    pub temperature: f64,

    #[serde(rename = "N", default)]
    pub nitrogen: Option<f64>,

    #[serde(rename = "P", default)]
    pub phosphorus: Option<f64>,

    #[serde(rename = "K", default)]
    pub potassium: Option<f64>,

    #[serde(default)]
    #[validate(custom(function = "validate_past_yields"))]
    pub past_yields: Vec<f64>,
}

fn validate_past_yields(past_yields: &[f64]) -> Result<(), ValidationError> {
    if past_yields.iter().any(|y| !y.is_finite() || *y < 0.0) {
        let mut error = ValidationError::new("past_yields");
        error.message = Some("past yields must be non-negative numbers".into());
        return Err(error);
    }

    Ok(())
}

impl YieldPredictionInput {
    pub fn features(&self) -> YieldFeatures {
        YieldFeatures {
            crop: self.crop.trim().to_string(),
            area: self.area,
            avg_rainfall: self.rainfall,
            pesticide_usage: self.pesticide_usage,
            temperature: self.temperature,
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            past_yields: self.past_yields.clone(),
        }
    }
}

/// Feature bundle handed to the yield model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldFeatures {
    pub crop: String,
    pub area: f64,
    pub avg_rainfall: f64,
    pub pesticide_usage: f64,
    pub temperature: f64,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub past_yields: Vec<f64>,
}

impl YieldFeatures {
    /// Mean of whichever of N, P and K were supplied
    pub fn mean_nutrients(&self) -> Option<f64> {
        let supplied: Vec<f64> = [self.nitrogen, self.phosphorus, self.potassium]
            .into_iter()
            .flatten()
            .collect();

        if supplied.is_empty() {
            None
        } else {
            Some(supplied.iter().sum::<f64>() / supplied.len() as f64)
        }
    }
}

/// Raw yield model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldEstimate {
    pub predicted_yield: f64,
    pub confidence_interval: [f64; 2],
    pub confidence: f64,
    /// Contribution of each input to the estimate
    #[serde(default)]
    pub factors: Option<BTreeMap<String, f64>>,
    pub unit: String,
}

impl YieldEstimate {
    /// True when every number in the estimate can be rendered as JSON
    pub fn is_finite(&self) -> bool {
        self.predicted_yield.is_finite()
            && self.confidence.is_finite()
            && self.confidence_interval.iter().all(|v| v.is_finite())
            && self
                .factors
                .as_ref()
                .is_none_or(|factors| factors.values().all(|v| v.is_finite()))
    }
}
