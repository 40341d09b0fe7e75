use serde::{Deserialize, Serialize};
use validator::Validate;

/// Soil and climate readings submitted for a crop recommendation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CropRecommendationInput {
    /// Nitrogen content
    #[serde(rename = "N")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub nitrogen: f64,

    /// Phosphorus content
    #[serde(rename = "P")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub phosphorus: f64,

    /// Potassium content
    #[serde(rename = "K")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub potassium: f64,

    #[serde(rename = "pH")]
    #[validate(range(min = 0.0, max = 14.0))]
    pub ph: f64,

    /// Degrees Celsius
    #[validate(range(min = -10.0, max = 50.0))]
    pub temperature: f64,

    /// Relative humidity, percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,

    /// Millimetres
    #[validate(range(min = 0.0, max = 500.0))]
    pub rainfall: f64,

    #[serde(default)]
    pub location: Option<String>,
}

impl CropRecommendationInput {
    pub fn features(&self) -> SoilFeatures {
        SoilFeatures {
            n: self.nitrogen,
            p: self.phosphorus,
            k: self.potassium,
            ph: self.ph,
            temperature: self.temperature,
            humidity: self.humidity,
            rainfall: self.rainfall,
        }
    }
}

/// Feature vector handed to the crop model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilFeatures {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

impl SoilFeatures {
    /// Values in model order: N, P, K, pH, temperature, humidity, rainfall
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.n,
            self.p,
            self.k,
            self.ph,
            self.temperature,
            self.humidity,
            self.rainfall,
        ]
    }
}

/// Farming context passed alongside the features
///
/// Requests cannot set these; every recommendation uses `Default`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropContext {
    pub season: String,
    pub market_demand: String,
    pub area_hectares: f64,
    pub irrigation_method: String,
}

impl Default for CropContext {
    fn default() -> Self {
        Self {
            season: "monsoon".to_string(),
            market_demand: "high".to_string(),
            area_hectares: 1.0,
            irrigation_method: "drip".to_string(),
        }
    }
}

/// One ranked crop as returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCandidate {
    pub crop: String,
    pub confidence: f64,
    /// Quintals per acre
    #[serde(default)]
    pub expected_yield: Option<f64>,
    #[serde(default)]
    pub expected_profit: Option<f64>,
    #[serde(default)]
    pub reasons: Option<Vec<String>>,
}

impl CropCandidate {
    pub fn new(crop: impl Into<String>, confidence: f64) -> Self {
        Self {
            crop: crop.into(),
            confidence,
            expected_yield: None,
            expected_profit: None,
            reasons: None,
        }
    }

    pub fn with_expected_yield(mut self, expected_yield: f64) -> Self {
        self.expected_yield = Some(expected_yield);
        self
    }

    pub fn with_expected_profit(mut self, expected_profit: f64) -> Self {
        self.expected_profit = Some(expected_profit);
        self
    }

    pub fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasons = Some(reasons);
        self
    }
}
