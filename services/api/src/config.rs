//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use promail_core::Coordinates;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub profile_dir: PathBuf,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub drafting_model: String,
    /// Deployment-site coordinates used to annotate usage entries, when the
    /// operator chooses to provide them. Absent means entries carry no
    /// location.
    pub site_location: Option<Coordinates>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Store Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let profile_dir = std::env::var("PROFILE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./profile"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        // --- Load Adapter-specific Settings ---
        let drafting_model =
            std::env::var("DRAFTING_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let site_location = Self::site_location_from_env()?;

        Ok(Self {
            bind_address,
            profile_dir,
            log_level,
            openai_api_key,
            drafting_model,
            site_location,
        })
    }

    fn site_location_from_env() -> Result<Option<Coordinates>, ConfigError> {
        let latitude = std::env::var("SITE_LATITUDE").ok();
        let longitude = std::env::var("SITE_LONGITUDE").ok();

        match (latitude, longitude) {
            (None, None) => Ok(None),
            (Some(lat), Some(lon)) => {
                let latitude = lat.parse::<f64>().map_err(|e| {
                    ConfigError::InvalidValue("SITE_LATITUDE".to_string(), e.to_string())
                })?;
                let longitude = lon.parse::<f64>().map_err(|e| {
                    ConfigError::InvalidValue("SITE_LONGITUDE".to_string(), e.to_string())
                })?;
                Ok(Some(Coordinates { latitude, longitude }))
            }
            // One without the other is a configuration mistake, not a
            // best-effort degradation.
            (Some(_), None) => Err(ConfigError::MissingVar("SITE_LONGITUDE".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingVar("SITE_LATITUDE".to_string())),
        }
    }
}
