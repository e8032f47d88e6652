//! `truck_sim` configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use truck_sim_classifier::config::ClassifierConfig;
use truck_sim_router::config::RouterConfig;
use truck_sim_trajectory::speed::DEFAULT_ROLLING_WINDOW;

/// Configuration used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Which value and why.
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the metro registry JSON.
    #[serde(default = "default_metros_file")]
    pub metros_file: PathBuf,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub speeds: SpeedsConfig,
}

/// Speed derivation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedsConfig {
    /// Centred window for the rolling mean, in samples.
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
}

impl Default for SpeedsConfig {
    fn default() -> Self {
        Self {
            rolling_window: default_rolling_window(),
        }
    }
}

fn default_metros_file() -> PathBuf {
    PathBuf::from("data/metros.json")
}

const fn default_rolling_window() -> usize {
    DEFAULT_ROLLING_WINDOW
}

impl AppConfig {
    /// Loads `path`, or the embedded [`DEFAULT_CONFIG`] when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// the rolling window is zero.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(path)?)
            }
            None => Self::from_toml_str(DEFAULT_CONFIG),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document is malformed or the rolling
    /// window is zero.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.speeds.rolling_window == 0 {
            return Err(ConfigError::Invalid {
                message: "speeds.rolling_window must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use truck_sim_trajectory_models::RouterBackend;

    use super::*;

    #[test]
    fn embedded_default_parses() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.metros_file, PathBuf::from("data/metros.json"));
        assert_eq!(config.router, RouterConfig::default());
        assert_eq!(
            config.classifier,
            ClassifierConfig::Boundaries {
                path: PathBuf::from("data/us_states.geojson")
            }
        );
        assert_eq!(config.speeds.rolling_window, 5);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.metros_file, PathBuf::from("data/metros.json"));
        assert_eq!(config.router.backend(), RouterBackend::Osrm);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.speeds, SpeedsConfig::default());
    }

    #[test]
    fn valhalla_with_nominatim() {
        let config = AppConfig::from_toml_str(
            r#"
            metros_file = "/srv/metros.json"

            [router]
            type = "valhalla"
            base_url = "http://localhost:8002"

            [classifier]
            type = "nominatim"
            pause_ms = 1500

            [speeds]
            rolling_window = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.router.backend(), RouterBackend::Valhalla);
        assert_eq!(config.router.base_url(), "http://localhost:8002");
        assert!(matches!(
            config.classifier,
            ClassifierConfig::Nominatim { pause_ms: 1500, batch_size: 10, .. }
        ));
        assert_eq!(config.speeds.rolling_window, 3);
    }

    #[test]
    fn zero_window_is_invalid() {
        let result = AppConfig::from_toml_str("[speeds]\nrolling_window = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_toml_is_error() {
        let result = AppConfig::from_toml_str("[router]\ntype = \"graphhopper\"\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join("truck_sim_config_test.toml");
        std::fs::write(&path, "[speeds]\nrolling_window = 7\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.speeds.rolling_window, 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/truck_sim.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
