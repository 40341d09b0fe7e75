//! Disease detector matching the leaf's mean colour against class signatures

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::artifact::read_artifact;
use crate::domain::{
    Annotations, BoundingBox, DiseaseDiagnosis, DiseaseModel, DomainError, ImageTensor,
    ModelKind, ModelLoader,
};

#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseClass {
    pub name: String,
    /// Mean RGB of a typical leaf in this class, each channel in `[0, 1]`
    pub signature: [f32; 3],
    /// Crops the class applies to; empty means every crop
    #[serde(default)]
    pub crops: Vec<String>,
    pub severity: String,
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub treatments: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
}

impl DiseaseClass {
    fn lists_crop(&self, crop: &str) -> bool {
        self.crops.iter().any(|c| c.eq_ignore_ascii_case(crop))
    }

    fn applies_to(&self, crop: &str) -> bool {
        self.crops.is_empty() || self.lists_crop(crop)
    }

    fn distance(&self, rgb: [f32; 3]) -> f32 {
        self.signature
            .iter()
            .zip(rgb)
            .map(|(s, v)| (s - v).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseSignatureArtifact {
    pub version: String,
    /// Softmax temperature applied to the colour distances
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    pub classes: Vec<DiseaseClass>,
}

fn default_temperature() -> f32 {
    0.1
}

pub struct DiseaseSignatureModel {
    artifact: DiseaseSignatureArtifact,
}

impl DiseaseSignatureModel {
    pub fn new(artifact: DiseaseSignatureArtifact) -> Result<Self, DomainError> {
        if artifact.classes.is_empty() {
            return Err(DomainError::model_load(
                ModelKind::DiseaseDetector,
                "artifact lists no disease classes",
            ));
        }
        if artifact.temperature <= 0.0 {
            return Err(DomainError::model_load(
                ModelKind::DiseaseDetector,
                "temperature must be positive",
            ));
        }
        if let Some(class) = artifact
            .classes
            .iter()
            .find(|c| c.signature.iter().any(|v| !(0.0..=1.0).contains(v)))
        {
            return Err(DomainError::model_load(
                ModelKind::DiseaseDetector,
                format!("signature of {} is outside [0, 1]", class.name),
            ));
        }

        Ok(Self { artifact })
    }

    /// Classes eligible for the hint, falling back to all of them when no
    /// class names the crop explicitly
    fn candidates(&self, crop_type: Option<&str>) -> Vec<&DiseaseClass> {
        let classes = &self.artifact.classes;

        match crop_type {
            Some(crop) if classes.iter().any(|c| c.lists_crop(crop)) => {
                classes.iter().filter(|c| c.applies_to(crop)).collect()
            }
            _ => classes.iter().collect(),
        }
    }
}

/// Box around the pixels where red is at least green
fn discoloured_region(image: &ImageTensor, label: &str) -> Option<BoundingBox> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;

    for y in 0..image.height() {
        for x in 0..image.width() {
            let [r, g, _] = image.pixel(y, x);
            if r < g {
                continue;
            }

            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    bounds.map(|(x0, y0, x1, y1)| BoundingBox {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0 + 1) as u32,
        height: (y1 - y0 + 1) as u32,
        label: label.to_string(),
    })
}

#[async_trait]
impl DiseaseModel for DiseaseSignatureModel {
    async fn predict(
        &self,
        image: &ImageTensor,
        crop_type: Option<String>,
    ) -> Result<DiseaseDiagnosis, DomainError> {
        let mean = image.mean_rgb();
        let candidates = self.candidates(crop_type.as_deref());

        let logits: Vec<f32> = candidates
            .iter()
            .map(|c| -c.distance(mean) / self.artifact.temperature)
            .collect();

        let (best, best_logit) = logits
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| {
                DomainError::prediction(ModelKind::DiseaseDetector, "no disease classes to score")
            })?;

        let normalizer: f32 = logits.iter().map(|l| (l - best_logit).exp()).sum();
        let confidence = f64::from(1.0 / normalizer);

        let class = candidates[best];
        let annotations = if class.healthy {
            None
        } else {
            discoloured_region(image, &class.name).map(|bbox| Annotations {
                bounding_boxes: vec![bbox],
            })
        };

        Ok(DiseaseDiagnosis {
            disease_name: class.name.clone(),
            severity: class.severity.clone(),
            confidence,
            treatment_recommendations: class.treatments.clone(),
            prevention_tips: Some(class.prevention.clone()).filter(|tips| !tips.is_empty()),
            annotations,
        })
    }
}

pub struct DiseaseSignatureLoader;

#[async_trait]
impl ModelLoader<dyn DiseaseModel> for DiseaseSignatureLoader {
    async fn load(&self, path: &Path) -> Result<Arc<dyn DiseaseModel>, DomainError> {
        let artifact: DiseaseSignatureArtifact =
            read_artifact(ModelKind::DiseaseDetector, path).await?;
        let model = DiseaseSignatureModel::new(artifact)?;

        Ok(Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::super::artifact::fixtures::shipped;
    use super::*;
    use crate::infrastructure::image::{test_images::solid_png, ImageProcessor};

    fn class(name: &str, signature: [f32; 3], crops: &[&str], healthy: bool) -> DiseaseClass {
        DiseaseClass {
            name: name.to_string(),
            signature,
            crops: crops.iter().map(|c| c.to_string()).collect(),
            severity: if healthy { "None" } else { "High" }.to_string(),
            healthy,
            treatments: vec![format!("Treat {}", name)],
            prevention: Vec::new(),
        }
    }

    fn model() -> DiseaseSignatureModel {
        DiseaseSignatureModel::new(DiseaseSignatureArtifact {
            version: "test".to_string(),
            temperature: 0.1,
            classes: vec![
                class("Healthy", [0.2, 0.6, 0.2], &[], true),
                class("Rust", [0.6, 0.4, 0.1], &["wheat"], false),
                class("Blight", [0.5, 0.4, 0.2], &["potato"], false),
            ],
        })
        .unwrap()
    }

    fn uniform(rgb: [f32; 3]) -> ImageTensor {
        ImageTensor::new(Array4::from_shape_fn((1, 8, 8, 3), |(_, _, _, c)| rgb[c])).unwrap()
    }

    #[tokio::test]
    async fn test_green_leaf_is_healthy_without_annotations() {
        let diagnosis = model().predict(&uniform([0.2, 0.6, 0.2]), None).await.unwrap();

        assert_eq!(diagnosis.disease_name, "Healthy");
        assert!(diagnosis.annotations.is_none());
        assert!(diagnosis.prevention_tips.is_none());
        assert!(diagnosis.confidence > 0.5 && diagnosis.confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_crop_hint_restricts_candidates() {
        let brownish = uniform([0.52, 0.4, 0.18]);

        let unhinted = model().predict(&brownish, None).await.unwrap();
        assert_eq!(unhinted.disease_name, "Blight");

        let wheat = model()
            .predict(&brownish, Some("Wheat".to_string()))
            .await
            .unwrap();
        assert_eq!(wheat.disease_name, "Rust");

        let unknown_crop = model()
            .predict(&brownish, Some("banana".to_string()))
            .await
            .unwrap();
        assert_eq!(unknown_crop.disease_name, "Blight");
    }

    #[tokio::test]
    async fn test_bounding_box_covers_discoloured_patch() {
        let data = Array4::from_shape_fn((1, 10, 10, 3), |(_, y, x, c)| {
            let patch = (2..5).contains(&x) && (6..9).contains(&y);
            match (patch, c) {
                (true, 0) => 0.9,
                (true, 1) => 0.3,
                (false, 1) => 0.8,
                _ => 0.1,
            }
        });
        let image = ImageTensor::new(data).unwrap();
        let single = DiseaseSignatureModel::new(DiseaseSignatureArtifact {
            version: "test".to_string(),
            temperature: 0.1,
            classes: vec![class("Leaf Spot", [0.5, 0.5, 0.1], &[], false)],
        })
        .unwrap();

        let diagnosis = single.predict(&image, None).await.unwrap();

        let boxes = diagnosis.annotations.unwrap().bounding_boxes;
        assert_eq!(
            boxes,
            vec![BoundingBox {
                x: 2,
                y: 6,
                width: 3,
                height: 3,
                label: "Leaf Spot".to_string(),
            }]
        );
        assert!((diagnosis.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_signature_out_of_range() {
        let result = DiseaseSignatureModel::new(DiseaseSignatureArtifact {
            version: "test".to_string(),
            temperature: 0.1,
            classes: vec![class("Odd", [1.2, 0.0, 0.0], &[], false)],
        });

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_shipped_artifact_on_processed_image() {
        let model = DiseaseSignatureLoader
            .load(&shipped("disease_detector.json"))
            .await
            .unwrap();
        let tensor = ImageProcessor::default()
            .process(&solid_png(40, 40, [60, 150, 50]))
            .unwrap();

        let diagnosis = model.predict(&tensor, None).await.unwrap();

        assert!(!diagnosis.disease_name.is_empty());
        assert!((0.0..=1.0).contains(&diagnosis.confidence));
    }
}
