//! Server configuration.
//!
//! Configuration merges three layers, weakest first: built-in defaults, an
//! optional TOML file (`AMENITY_MAP_CONFIG`), and environment overrides
//! (`BIND_ADDR`, `PORT`, `AMENITY_MAP_DATASET`). Every field has a default
//! so a bare `amenity_map_server` start works against `data/facilities.json`.

use amenity_map_facility_models::{FALLBACK_LATITUDE, FALLBACK_LONGITUDE};
use serde::Deserialize;

/// Environment variable naming the TOML config file.
pub const CONFIG_ENV: &str = "AMENITY_MAP_CONFIG";
/// Environment variable overriding the dataset path.
pub const DATASET_ENV: &str = "AMENITY_MAP_DATASET";

/// Complete server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the dataset file to serve.
    pub dataset: String,
    /// Bind address.
    pub bind_addr: String,
    /// Bind port.
    pub port: u16,
    /// Map center and user fallback when no position is available.
    pub default_location: DefaultLocation,
    /// Default number of nearest facilities when a query has no `k`.
    pub nearest_count: usize,
    /// Re-rank cadence advertised to the frontend, in seconds.
    pub refresh_seconds: u64,
}

/// The configured fallback point.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DefaultLocation {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: "data/facilities.json".to_owned(),
            bind_addr: "127.0.0.1".to_owned(),
            port: 8080,
            default_location: DefaultLocation::default(),
            nearest_count: 5,
            refresh_seconds: 30,
        }
    }
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            lat: FALLBACK_LATITUDE,
            lng: FALLBACK_LONGITUDE,
        }
    }
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// Reads the TOML file named by `AMENITY_MAP_CONFIG` when set, then
    /// applies environment overrides on top.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the named config file cannot be read.
    /// * [`ConfigError::Toml`] if it does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                log::info!("Reading config from {path}");
                let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                toml::de::from_str(&text)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Ok(dataset) = std::env::var(DATASET_ENV) {
            self.dataset = dataset;
        }
    }
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_campus_fallback() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.nearest_count, 5);
        assert!((config.default_location.lat - FALLBACK_LATITUDE).abs() < f64::EPSILON);
        assert!((config.default_location.lng - FALLBACK_LONGITUDE).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_a_partial_toml_file() {
        let config: AppConfig = toml::de::from_str(
            r#"
            dataset = "exports/facilities.csv"
            port = 9443

            [default_location]
            lat = 25.0330
            lng = 121.5654
            "#,
        )
        .unwrap();

        assert_eq!(config.dataset, "exports/facilities.csv");
        assert_eq!(config.port, 9443);
        // Unspecified fields keep their defaults.
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.refresh_seconds, 30);
        assert!((config.default_location.lat - 25.0330).abs() < f64::EPSILON);
    }
}
