use serde::Serialize;

use super::entity::CropCandidate;

/// Recommendations kept from the model's ranking
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Profit strictly above this is `High`
pub const HIGH_PROFIT_THRESHOLD: f64 = 10_000.0;

/// Reasons reported when the top candidate carries none
pub const FALLBACK_REASONS: [&str; 3] = [
    "Soil nutrient levels are suitable for these crops",
    "Weather conditions favor these crop types",
    "Good market demand expected",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfitPotential {
    High,
    Medium,
}

impl ProfitPotential {
    /// Absent profit counts as zero
    pub fn classify(expected_profit: Option<f64>) -> Self {
        if expected_profit.unwrap_or(0.0) > HIGH_PROFIT_THRESHOLD {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// A shaped recommendation as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    pub crop: String,
    pub confidence: f64,
    pub yield_estimate: String,
    pub profit_potential: ProfitPotential,
}

impl From<&CropCandidate> for RecommendationItem {
    fn from(candidate: &CropCandidate) -> Self {
        Self {
            crop: candidate.crop.clone(),
            confidence: candidate.confidence,
            yield_estimate: format_yield_estimate(candidate.expected_yield),
            profit_potential: ProfitPotential::classify(candidate.expected_profit),
        }
    }
}

/// `"{value:.1} quintals/acre"`, with a missing value shown as 0
pub fn format_yield_estimate(expected_yield: Option<f64>) -> String {
    format!("{:.1} quintals/acre", expected_yield.unwrap_or(0.0))
}

/// Reasons of the top-ranked candidate only, or the fixed fallback
pub fn select_reasons(candidates: &[CropCandidate]) -> Vec<String> {
    match candidates.first().and_then(|top| top.reasons.as_ref()) {
        Some(reasons) if !reasons.is_empty() => reasons.clone(),
        _ => FALLBACK_REASONS.iter().map(|r| r.to_string()).collect(),
    }
}

/// Model output after the recommendation business rules
#[derive(Debug, Clone, PartialEq)]
pub struct CropRecommendation {
    pub recommendations: Vec<RecommendationItem>,
    pub reasons: Vec<String>,
    pub model_version: String,
}

impl CropRecommendation {
    /// Keep the first `MAX_RECOMMENDATIONS` in model order; never re-sorts
    pub fn from_candidates(candidates: &[CropCandidate], model_version: impl Into<String>) -> Self {
        Self {
            recommendations: candidates
                .iter()
                .take(MAX_RECOMMENDATIONS)
                .map(RecommendationItem::from)
                .collect(),
            reasons: select_reasons(candidates),
            model_version: model_version.into(),
        }
    }
}
