use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::models::StoreId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub enabled_stores: Vec<StoreId>,
    /// Global cap on in-flight requests for one batch.
    pub max_connections: usize,
    /// Cap on in-flight requests against any single host.
    pub max_connections_per_host: usize,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Courtesy pause enforced between the end of one batch and the start of the next.
    pub batch_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub directory: Option<String>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            enabled_stores: StoreId::ALL.to_vec(),
            max_connections: 30,
            max_connections_per_host: 10,
            request_timeout_secs: 15,
            connect_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
            batch_delay_ms: 1000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 900 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "discount-finder.log".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &run_mode)
    }

    /// Layers built-in defaults, `<dir>/default`, `<dir>/<run_mode>`,
    /// `<dir>/local` and `DEALS__*` environment variables, in that order.
    pub fn load_from(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let layer = |name: &str| {
            File::with_name(&config_dir.join(name).to_string_lossy()).required(false)
        };

        let s = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(layer("default"))
            .add_source(layer(run_mode))
            // Local overrides (ignored by git)
            .add_source(layer("local"))
            // DEALS__SCRAPER__ENABLED_STORES=iconic,asos
            .add_source(
                Environment::with_prefix("DEALS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scraper.enabled_stores")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if self.scraper.max_connections == 0 {
            return Err(ConfigError::Message(
                "Scraper max_connections must be greater than 0".into(),
            ));
        }

        if self.scraper.max_connections_per_host == 0 {
            return Err(ConfigError::Message(
                "Scraper max_connections_per_host must be greater than 0".into(),
            ));
        }

        if self.scraper.max_connections_per_host > self.scraper.max_connections {
            return Err(ConfigError::Message(
                "Scraper max_connections_per_host cannot exceed max_connections".into(),
            ));
        }

        if self.scraper.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Scraper request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.cache.ttl_seconds == 0 {
            return Err(ConfigError::Message("Cache ttl_seconds must be greater than 0".into()));
        }

        Ok(())
    }
}
