//! Classifier configuration.
//!
//! Deserialized from the `[classifier]` table of the `truck_sim` TOML
//! config, tagged by `type`:
//!
//! ```toml
//! [classifier]
//! type = "nominatim"
//! batch_size = 10
//! pause_ms = 1000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use truck_sim_geocoder::{
    DEFAULT_NOMINATIM_REVERSE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, build_client,
};
use truck_sim_trajectory_models::Coordinate;

use crate::boundary::BoundaryClassifier;
use crate::geocode::ReverseGeocodeClassifier;
use crate::progress::ProgressCallback;
use crate::throttle::{BatchPauseThrottle, NoThrottle, Throttle};
use crate::{ClassifierError, StateClassifier};

/// Which classification strategy to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierConfig {
    /// Nominatim reverse geocoding.
    Nominatim {
        /// Full `reverse` endpoint URL.
        #[serde(default = "default_nominatim_url")]
        base_url: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
        /// `User-Agent` header; Nominatim rejects anonymous clients.
        #[serde(default = "default_user_agent")]
        user_agent: String,
        /// Lookups between pauses. Zero disables pausing.
        #[serde(default = "default_batch_size")]
        batch_size: usize,
        /// Pause length in milliseconds.
        #[serde(default = "default_pause_ms")]
        pause_ms: u64,
    },
    /// Point-in-polygon against a local `GeoJSON` boundary file.
    Boundaries {
        /// Path to the `FeatureCollection`.
        path: PathBuf,
    },
}

fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_REVERSE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_batch_size() -> usize {
    10
}

const fn default_pause_ms() -> u64 {
    1000
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::Nominatim {
            base_url: default_nominatim_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            batch_size: default_batch_size(),
            pause_ms: default_pause_ms(),
        }
    }
}

/// A classifier paired with the pacing it needs.
pub struct ConfiguredClassifier {
    /// The selected strategy.
    pub classifier: Box<dyn StateClassifier>,
    /// Pacing applied before each lookup.
    pub throttle: Box<dyn Throttle>,
}

impl ConfiguredClassifier {
    /// Classifies `coords` in order. See [`crate::classify_batch`].
    pub async fn classify_batch(
        &self,
        coords: &[Coordinate],
        progress: &dyn ProgressCallback,
    ) -> Vec<String> {
        crate::classify_batch(
            self.classifier.as_ref(),
            coords,
            self.throttle.as_ref(),
            progress,
        )
        .await
    }
}

/// Builds the classifier selected by `config`.
///
/// The boundary strategy never fails to build; an unreadable boundary
/// file is logged and every point becomes `UNKNOWN`.
///
/// # Errors
///
/// Returns [`ClassifierError::Geocode`] if the Nominatim HTTP client
/// cannot be built.
pub fn create_classifier(config: &ClassifierConfig) -> Result<ConfiguredClassifier, ClassifierError> {
    match config {
        ClassifierConfig::Nominatim {
            base_url,
            timeout_secs,
            user_agent,
            batch_size,
            pause_ms,
        } => {
            let client = build_client(user_agent, Duration::from_secs(*timeout_secs))?;
            log::info!("Using Nominatim classifier at {base_url}");
            Ok(ConfiguredClassifier {
                classifier: Box::new(ReverseGeocodeClassifier::new(client, base_url.clone())),
                throttle: Box::new(BatchPauseThrottle::new(
                    *batch_size,
                    Duration::from_millis(*pause_ms),
                )),
            })
        }
        ClassifierConfig::Boundaries { path } => Ok(ConfiguredClassifier {
            classifier: Box::new(BoundaryClassifier::load_or_empty(path)),
            throttle: Box::new(NoThrottle),
        }),
    }
}

#[cfg(test)]
mod tests {
    use truck_sim_trajectory_models::UNKNOWN_STATE;

    use super::*;
    use crate::progress::NullProgress;

    #[derive(Deserialize)]
    struct Wrapper {
        classifier: ClassifierConfig,
    }

    fn parse(toml_str: &str) -> ClassifierConfig {
        toml::from_str::<Wrapper>(toml_str).unwrap().classifier
    }

    #[test]
    fn nominatim_defaults() {
        let config = parse("[classifier]\ntype = \"nominatim\"\n");
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn nominatim_overrides() {
        let config = parse(
            r#"
            [classifier]
            type = "nominatim"
            base_url = "http://localhost:8080/reverse"
            batch_size = 5
            pause_ms = 250
            "#,
        );
        let ClassifierConfig::Nominatim {
            base_url,
            timeout_secs,
            batch_size,
            pause_ms,
            ..
        } = config
        else {
            panic!("expected nominatim config");
        };
        assert_eq!(base_url, "http://localhost:8080/reverse");
        assert_eq!(timeout_secs, 10);
        assert_eq!(batch_size, 5);
        assert_eq!(pause_ms, 250);
    }

    #[test]
    fn boundaries_requires_path() {
        let config = parse("[classifier]\ntype = \"boundaries\"\npath = \"data/us_states.geojson\"\n");
        assert_eq!(
            config,
            ClassifierConfig::Boundaries {
                path: PathBuf::from("data/us_states.geojson")
            }
        );
        assert!(toml::from_str::<Wrapper>("[classifier]\ntype = \"boundaries\"\n").is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(toml::from_str::<Wrapper>("[classifier]\ntype = \"census\"\n").is_err());
    }

    #[test]
    fn creates_nominatim_classifier() {
        let configured = create_classifier(&ClassifierConfig::default()).unwrap();
        assert_eq!(configured.classifier.name(), "nominatim");
    }

    #[tokio::test]
    async fn unreadable_boundaries_classify_unknown() {
        let configured = create_classifier(&ClassifierConfig::Boundaries {
            path: PathBuf::from("/nonexistent/us_states.geojson"),
        })
        .unwrap();
        assert_eq!(configured.classifier.name(), "boundaries");

        let coords = [Coordinate::new(40.0, -75.0), Coordinate::new(34.0, -118.2)];
        let labels = configured.classify_batch(&coords, &NullProgress).await;
        assert_eq!(labels, [UNKNOWN_STATE, UNKNOWN_STATE]);
    }
}
