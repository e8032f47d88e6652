//! Classification by Nominatim reverse geocoding.

use truck_sim_geocoder::{nominatim, state_codes};
use truck_sim_trajectory_models::{Coordinate, UNKNOWN_STATE};

use crate::StateClassifier;

/// Labels points with the state Nominatim reports for them.
///
/// Does no pacing of its own; see [`crate::throttle`].
pub struct ReverseGeocodeClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl ReverseGeocodeClassifier {
    /// Creates a classifier that sends requests to `base_url` (the full
    /// `reverse` endpoint) with `client`.
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// The `reverse` endpoint requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl StateClassifier for ReverseGeocodeClassifier {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn classify(&self, coord: Coordinate) -> String {
        match nominatim::reverse(&self.client, &self.base_url, coord).await {
            Ok(address) => state_codes::state_label(&address),
            Err(e) => {
                log::warn!("Nominatim error for {coord}: {e}");
                UNKNOWN_STATE.to_string()
            }
        }
    }
}
