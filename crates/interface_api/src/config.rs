//! API configuration

use claims_pipeline::PipelineConfig;
use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Pipeline tunables
    pub pipeline: PipelineConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the environment
    ///
    /// Variables use the `INSTACLAIM_` prefix; nested pipeline fields
    /// use a double underscore, e.g.
    /// `INSTACLAIM_PIPELINE__PROVIDER_TIMEOUT_MS=200`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("INSTACLAIM").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
