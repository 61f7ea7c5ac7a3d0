//! Configuration management for the agronomic estimate server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::AlertThresholds;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Estimate engine limits and alert rules
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Largest accepted request body in bytes
    pub body_limit_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Maximum crops plus farms accepted in one request
    pub max_records: usize,

    /// Alert rule thresholds
    #[serde(default)]
    pub alerts: AlertThresholds,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = AlertThresholds::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.body_limit_bytes", 2 * 1024 * 1024)?
            .set_default("engine.max_records", 5000)?
            .set_default("engine.alerts.high_water_mm", defaults.high_water_mm.to_string())?
            .set_default(
                "engine.alerts.growth_window_start_days",
                defaults.growth_window_start_days,
            )?
            .set_default("engine.alerts.growth_window_end_days", defaults.growth_window_end_days)?
            .set_default("engine.alerts.harvest_window_days", defaults.harvest_window_days)?
            .set_default("engine.alerts.display_limit", defaults.display_limit as u64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRO_ prefix)
            .add_source(
                Environment::with_prefix("AGRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the engine cannot work with
    pub fn check(&self) -> AppResult<()> {
        if self.engine.max_records == 0 {
            return Err(AppError::Configuration(
                "engine.max_records must be greater than 0".to_string(),
            ));
        }
        let alerts = &self.engine.alerts;
        if alerts.growth_window_start_days >= alerts.growth_window_end_days {
            return Err(AppError::Configuration(
                "engine.alerts growth window start must be before its end".to_string(),
            ));
        }
        if alerts.harvest_window_days < 0 {
            return Err(AppError::Configuration(
                "engine.alerts.harvest_window_days cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_records: 5000,
            alerts: AlertThresholds::default(),
        }
    }
}
