//! Disease detection - upload contract and diagnosis

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// True when a declared content type names an image (`image/*`)
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Reject anything that does not declare an image content type
pub fn ensure_image_content_type(content_type: Option<&str>) -> Result<(), DomainError> {
    match content_type {
        Some(ct) if is_image_content_type(ct) => Ok(()),
        Some(ct) => Err(DomainError::unsupported_media(format!(
            "File must be an image, got '{}'",
            ct
        ))),
        None => Err(DomainError::unsupported_media(
            "File must be an image, no content type was declared",
        )),
    }
}

/// An uploaded leaf image plus an optional crop hint
///
/// Only constructible for image content types, so a rejected upload never
/// reaches the pipeline or the model.
#[derive(Debug, Clone)]
pub struct DiseaseDetectionInput {
    file_name: Option<String>,
    content_type: String,
    data: Bytes,
    crop_type: Option<String>,
}

impl DiseaseDetectionInput {
    pub fn new(
        file_name: Option<String>,
        content_type: Option<&str>,
        data: Bytes,
        crop_type: Option<String>,
    ) -> Result<Self, DomainError> {
        ensure_image_content_type(content_type)?;

        Ok(Self {
            file_name,
            content_type: content_type.unwrap_or_default().to_string(),
            data,
            crop_type: crop_type
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn crop_type(&self) -> Option<&str> {
        self.crop_type.as_deref()
    }
}

/// Region of the image the model flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bounding_boxes: Vec<BoundingBox>,
}

/// Raw disease model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseDiagnosis {
    pub disease_name: String,
    pub severity: String,
    pub confidence: f64,
    pub treatment_recommendations: Vec<String>,
    #[serde(default)]
    pub prevention_tips: Option<Vec<String>>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG"));
        assert!(is_image_content_type("image/webp; charset=binary"));
        assert!(!is_image_content_type("text/plain"));
        assert!(!is_image_content_type("application/octet-stream"));
    }

    #[test]
    fn test_input_rejects_non_image() {
        let err = DiseaseDetectionInput::new(
            Some("notes.txt".to_string()),
            Some("text/plain"),
            Bytes::from_static(b"hello"),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::UnsupportedMedia { .. }));
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn test_input_rejects_missing_content_type() {
        let err = DiseaseDetectionInput::new(None, None, Bytes::new(), None).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedMedia { .. }));
    }

    #[test]
    fn test_blank_crop_type_dropped() {
        let input = DiseaseDetectionInput::new(
            Some("leaf.png".to_string()),
            Some("image/png"),
            Bytes::from_static(b"\x89PNG"),
            Some("   ".to_string()),
        )
        .unwrap();

        assert_eq!(input.crop_type(), None);
        assert_eq!(input.content_type(), "image/png");
        assert_eq!(input.file_name(), Some("leaf.png"));
    }

    #[test]
    fn test_diagnosis_optional_fields_default() {
        let diagnosis: DiseaseDiagnosis = serde_json::from_value(serde_json::json!({
            "disease_name": "Leaf Blight",
            "severity": "Medium",
            "confidence": 0.82,
            "treatment_recommendations": ["Remove affected leaves"]
        }))
        .unwrap();

        assert!(diagnosis.prevention_tips.is_none());
        assert!(diagnosis.annotations.is_none());
    }
}
