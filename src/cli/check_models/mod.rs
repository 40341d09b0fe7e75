//! Check-models command - loads every model once and prints the registry status

use anyhow::bail;
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::RegistryStatus;
use crate::infrastructure::logging;
use crate::infrastructure::models::create_model_registry;

/// Load every configured model, print `status()` as JSON
///
/// Fails when any model did not reach the ready state.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let registry = create_model_registry(&config.models);
    if let Err(e) = registry.load_all().await {
        warn!(error = %e, "Model loading finished with errors");
    }

    let status = registry.status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    let failed = failed_models(&status);
    if !failed.is_empty() {
        bail!("{} model(s) failed to load: {}", failed.len(), failed.join(", "));
    }

    Ok(())
}

fn failed_models(status: &RegistryStatus) -> Vec<&'static str> {
    status
        .iter()
        .filter(|(_, model)| !model.loaded)
        .map(|(kind, _)| kind.as_str())
        .collect()
}
