#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-point US state classification.
//!
//! Two interchangeable strategies implement [`StateClassifier`]:
//!
//! 1. [`geocode::ReverseGeocodeClassifier`] asks Nominatim for the
//!    address at each point and reduces it to a state code.
//! 2. [`boundary::BoundaryClassifier`] does a point-in-polygon lookup
//!    against a state boundary set loaded from `GeoJSON`.
//!
//! Neither strategy ever fails: any error becomes
//! [`UNKNOWN_STATE`](truck_sim_trajectory_models::UNKNOWN_STATE). Request
//! pacing is kept out of the strategies in the [`throttle`] module and
//! applied by [`classify_batch`].

pub mod boundary;
pub mod config;
pub mod geocode;
pub mod progress;
pub mod throttle;

use thiserror::Error;
use truck_sim_geocoder::GeocodeError;
use truck_sim_trajectory_models::Coordinate;

use crate::progress::ProgressCallback;
use crate::throttle::Throttle;

/// Errors from building a classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The geocoding HTTP client could not be built.
    #[error("Geocoder error: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Maps a coordinate to a state label.
#[async_trait::async_trait]
pub trait StateClassifier: Send + Sync {
    /// Short strategy name for logging (e.g. `"nominatim"`).
    fn name(&self) -> &'static str;

    /// Label for `coord`, or
    /// [`UNKNOWN_STATE`](truck_sim_trajectory_models::UNKNOWN_STATE) if it
    /// cannot be attributed. Never fails.
    async fn classify(&self, coord: Coordinate) -> String;
}

/// Classifies every coordinate in order, one at a time.
///
/// `throttle` is consulted before each lookup with the lookup's index.
/// Individual failures are already folded into `UNKNOWN` by the
/// classifier, so the batch always returns one label per coordinate.
pub async fn classify_batch(
    classifier: &dyn StateClassifier,
    coords: &[Coordinate],
    throttle: &dyn Throttle,
    progress: &dyn ProgressCallback,
) -> Vec<String> {
    let total = coords.len();
    progress.set_total(total as u64);

    let mut labels = Vec::with_capacity(total);
    for (index, coord) in coords.iter().enumerate() {
        throttle.before_lookup(index, total).await;
        labels.push(classifier.classify(*coord).await);
        progress.inc(1);
    }

    progress.finish(format!(
        "Classified {total} points with {}",
        classifier.name()
    ));
    labels
}
