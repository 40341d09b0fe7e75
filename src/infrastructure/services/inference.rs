use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{error, warn};

use crate::domain::{DomainError, ModelKind};
use crate::infrastructure::observability::record_inference;

/// Run one predict call under the inference timeout
///
/// Model failures surface as `Prediction` errors carrying the model's own
/// message. Input rejections raised by the model keep their client-error
/// kind. Every call is counted and timed, and failures are logged.
pub async fn invoke<T, F>(kind: ModelKind, limit: Duration, call: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    let started = Instant::now();

    let outcome = match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e @ DomainError::Prediction { .. })) => Err(e),
        Ok(Err(e)) if e.is_client_error() => Err(e),
        Ok(Err(e)) => Err(DomainError::prediction(kind, e.to_string())),
        Err(_) => Err(DomainError::model_timeout(kind, limit)),
    };

    record_inference(kind, outcome.is_ok(), started.elapsed());

    match &outcome {
        Err(e) if e.is_client_error() => warn!(model = %kind, error = %e, "Model rejected input"),
        Err(e) => error!(model = %kind, error = %e, "Inference failed"),
        Ok(_) => {}
    }

    outcome
}
