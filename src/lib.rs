//! AgriSense inference service
//!
//! Serves three agricultural models over HTTP:
//! - crop recommendation from soil and climate readings
//! - yield prediction from growing conditions and harvest history
//! - plant disease detection from leaf images
//!
//! Models are loaded from JSON artifacts into a registry that tracks their
//! readiness and supports reloading while the service keeps serving.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use infrastructure::models::create_model_registry;
use infrastructure::observability::record_registry_status;
use tracing::{info, warn};

/// Create the application state and load every model
///
/// A model that fails to load leaves the service degraded rather than down;
/// its endpoints answer 503 until a reload succeeds.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry = Arc::new(create_model_registry(&config.models));

    match registry.load_all().await {
        Ok(()) => info!("Model registry ready"),
        Err(e) => warn!(error = %e, "Starting with some models unavailable"),
    }

    let status = registry.status().await;
    record_registry_status(&status);

    Ok(AppState::new(
        registry,
        Duration::from_secs(config.inference.timeout_secs),
    ))
}
