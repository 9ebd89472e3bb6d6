use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::cep;

fn default_bind_addr() -> String {
    "0.0.0.0:3333".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:3333/api".to_string()
}

fn default_cep_base_url() -> String {
    cep::DEFAULT_BASE_URL.to_string()
}

fn default_log_file() -> String {
    "client-registry.log".to_string()
}

/// Configuration for the application
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Postgres connection URL. Without one the server keeps clients in
    /// memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Address the API server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the API, as used by the terminal UI
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the postal-code directory
    #[serde(default = "default_cep_base_url")]
    pub cep_base_url: String,

    /// Where the terminal UI writes its logs
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Parse configuration from explicit key/value pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(pairs)?)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
