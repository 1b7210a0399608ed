use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

use crate::services::batch_pricing::PricingStrategy;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_OVERRIDE_TTL_MINUTES: i64 = 30;
const DEFAULT_CASHIER_DISCOUNT_CEILING: f64 = 10.0;
const DEFAULT_EXPIRING_SOON_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Pricing engine configuration. Read once at startup and injected into the
/// services; nothing re-reads these per call.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Batch selection strategy: "fifo", "fefo", or "weighted_average"
    #[serde(default = "default_strategy")]
    pub strategy: PricingStrategy,

    /// Highest discount percentage a cashier may apply without approval
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_cashier_ceiling")]
    pub cashier_discount_ceiling_percent: f64,

    /// Minutes before a pending price override request expires
    #[validate(range(min = 1, max = 1440))]
    #[serde(default = "default_override_ttl")]
    pub override_ttl_minutes: i64,

    /// Window used by the expiring-soon stock report
    #[validate(range(min = 1, max = 365))]
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            cashier_discount_ceiling_percent: default_cashier_ceiling(),
            override_ttl_minutes: default_override_ttl(),
            expiring_soon_days: default_expiring_soon_days(),
        }
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Pricing engine settings
    #[serde(default)]
    #[validate]
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
            || self.environment.eq_ignore_ascii_case("dev")
    }
}

fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}
fn default_strategy() -> PricingStrategy {
    PricingStrategy::Fifo
}
fn default_cashier_ceiling() -> f64 {
    DEFAULT_CASHIER_DISCOUNT_CEILING
}
fn default_override_ttl() -> i64 {
    DEFAULT_OVERRIDE_TTL_MINUTES
}
fn default_expiring_soon_days() -> i64 {
    DEFAULT_EXPIRING_SOON_DAYS
}

/// Loads configuration from `config/default.toml`, an environment-specific
/// file, and `APP__*` environment variables (highest precedence).
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://medipos.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    Ok(app_config)
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured
/// level when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("medipos_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::try_new(filter_directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_defaults_are_sane() {
        let cfg = PricingConfig::default();
        assert_eq!(cfg.strategy, PricingStrategy::Fifo);
        assert_eq!(cfg.override_ttl_minutes, 30);
        assert!(cfg.cashier_discount_ceiling_percent <= 100.0);
    }
}
