use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Runtime mode of the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    #[default]
    Production,
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL, not needed when running on the in-memory store
    pub database_url: Option<String>,
    /// Size of the PostgreSQL connection pool
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// `development` exposes the GraphiQL explorer
    #[serde(default)]
    pub app_env: AppEnv,
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>().context("invalid environment configuration")?;

        Ok(config)
    }

    /// Get the database URL, failing if it was not configured
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set unless --in-memory is used")
    }

    pub fn is_development(&self) -> bool {
        self.app_env == AppEnv::Development
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}
