use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request body cap, covering image uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where each model artifact lives and how long a load may take
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_crop_recommender_path")]
    pub crop_recommender_path: String,
    #[serde(default = "default_yield_predictor_path")]
    pub yield_predictor_path: String,
    #[serde(default = "default_disease_detector_path")]
    pub disease_detector_path: String,
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Upper bound on a single predict call
    #[serde(default = "default_inference_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5000".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_crop_recommender_path() -> String {
    "models/crop_recommender.json".to_string()
}

fn default_yield_predictor_path() -> String {
    "models/yield_predictor.json".to_string()
}

fn default_disease_detector_path() -> String {
    "models/disease_detector.json".to_string()
}

fn default_load_timeout_secs() -> u64 {
    60
}

fn default_inference_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            crop_recommender_path: default_crop_recommender_path(),
            yield_predictor_path: default_yield_predictor_path(),
            disease_detector_path: default_disease_detector_path(),
            load_timeout_secs: default_load_timeout_secs(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_inference_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.server.cors_allowed_origins.len(), 2);
        assert_eq!(config.models.load_timeout_secs, 60);
        assert_eq!(config.models.crop_recommender_path, "models/crop_recommender.json");
        assert_eq!(config.inference.timeout_secs, 30);
        assert!(matches!(config.logging.format, LogFormat::Pretty));
    }

    #[test]
    fn test_partial_sources_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 9100

                [logging]
                format = "json"

                [models]
                yield_predictor_path = "/opt/models/yield.json"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.models.yield_predictor_path, "/opt/models/yield.json");
        assert_eq!(config.models.disease_detector_path, "models/disease_detector.json");
        assert_eq!(config.inference.timeout_secs, 30);
        assert!(config.observability.metrics.enabled);
    }
}
