//! Prometheus metrics

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::{ModelKind, RegistryStatus};

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("numeric segment regex is valid"));

const MAX_PATH_LABEL_LEN: usize = 50;

/// Handle to the installed Prometheus recorder
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Install the global recorder; `None` when disabled or already installed
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if config.include_process_metrics {
                gauge!("agrisense_inference_info", "version" => env!("CARGO_PKG_VERSION"))
                    .set(1.0);
            }

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Router serving the exposition at the configured path
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one predict call against `model`
pub fn record_inference(model: ModelKind, success: bool, duration: Duration) {
    let labels = [
        ("model", model.as_str().to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("model_inference_total", &labels).increment(1);
    histogram!("model_inference_duration_seconds", &labels).record(duration.as_secs_f64());

    if !success {
        counter!("model_inference_errors_total", &labels).increment(1);
    }
}

/// Publish `model_ready` for every slot
pub fn record_registry_status(status: &RegistryStatus) {
    for (kind, model) in status.iter() {
        gauge!("model_ready", "model" => kind.as_str()).set(if model.loaded { 1.0 } else { 0.0 });
    }
}

/// Collapse numeric ids and cap length to keep label cardinality bounded
fn sanitize_path(path: &str) -> String {
    let path = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");

    path.chars().take(MAX_PATH_LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_keeps_static_routes() {
        assert_eq!(sanitize_path("/recommend/crop"), "/recommend/crop");
        assert_eq!(sanitize_path("/models/status"), "/models/status");
    }

    #[test]
    fn test_sanitize_path_numeric_segments() {
        assert_eq!(sanitize_path("/models/42/status"), "/models/{id}/status");
        assert_eq!(sanitize_path("/models/7"), "/models/{id}");
    }

    #[test]
    fn test_sanitize_path_truncates() {
        let long = format!("/{}", "segment/".repeat(20));
        assert_eq!(sanitize_path(&long).chars().count(), MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_inference(ModelKind::YieldPredictor, false, Duration::from_millis(3));
        record_http_request("POST", "/predict/yield", 504, Duration::from_millis(3));
    }
}
