use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{DomainError, ModelKind};

/// Read and parse the JSON artifact for `kind`
pub async fn read_artifact<T: DeserializeOwned>(
    kind: ModelKind,
    path: &Path,
) -> Result<T, DomainError> {
    let raw = tokio::fs::read(path).await.map_err(|e| {
        DomainError::model_load(kind, format!("cannot read {}: {}", path.display(), e))
    })?;

    debug!(model = %kind, path = %path.display(), bytes = raw.len(), "Read model artifact");

    serde_json::from_slice(&raw).map_err(|e| {
        DomainError::model_load(kind, format!("malformed artifact {}: {}", path.display(), e))
    })
}


#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::fixtures::temp_artifact;
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        version: String,
    }

    #[tokio::test]
    async fn test_reads_valid_artifact() {
        let path = temp_artifact(r#"{"version": "2.1.0"}"#);

        let sample: Sample = read_artifact(ModelKind::CropRecommender, &path).await.unwrap();

        assert_eq!(sample.version, "2.1.0");
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let err = read_artifact::<Sample>(ModelKind::YieldPredictor, Path::new("/nope/missing.json"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::ModelLoad { model: ModelKind::YieldPredictor, .. }
        ));
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_load_error() {
        let path = temp_artifact("{ not json");

        let err = read_artifact::<Sample>(ModelKind::DiseaseDetector, &path)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ModelLoad { .. }));
        assert!(err.to_string().contains("malformed artifact"));
    }
}
