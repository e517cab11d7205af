//! Configuration for citytime

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable overriding `upstream.base_url`
pub const UPSTREAM_URL_ENV: &str = "CITYTIME_UPSTREAM_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// World-time service settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Cities present in the registry at startup
    #[serde(default = "default_seed")]
    pub seed: Vec<SeedCity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Timezone listing endpoint; per-zone lookups go to `{base_url}/{zone}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every upstream request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of enrichment calls in flight for one list request
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// A city entry from the config file, validated against the catalog at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCity {
    pub name: String,
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            upstream: UpstreamConfig::default(),
            seed: default_seed(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from the default location or fall back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            Self::read_file(&config_path)?
        } else {
            Config::default()
        };

        Ok(config.with_env_overrides())
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        Ok(Self::read_file(path)?.with_env_overrides())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(UPSTREAM_URL_ENV) {
            if !url.trim().is_empty() {
                self.upstream.base_url = url;
            }
        }
        self
    }

    /// Get the default config path
    fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not find home directory".into()))?;
        Ok(home.join(".citytime").join("config.toml"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(Error::Config("upstream.base_url must not be empty".into()));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::Config("upstream.timeout_secs must be positive".into()));
        }
        if self.upstream.max_concurrency == 0 {
            return Err(Error::Config(
                "upstream.max_concurrency must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }
}

// Default value functions

fn default_http_port() -> u16 {
    8000
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_base_url() -> String {
    "http://worldtimeapi.org/api/timezone".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_concurrency() -> usize {
    8
}

fn default_seed() -> Vec<SeedCity> {
    vec![
        SeedCity {
            name: "London".into(),
            timezone: "Europe/London".into(),
        },
        SeedCity {
            name: "Paris".into(),
            timezone: "Europe/Paris".into(),
        },
    ]
}
