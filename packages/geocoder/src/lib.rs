#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reverse geocoding of coordinates to US state labels.
//!
//! Uses the Nominatim / `OpenStreetMap` `reverse` endpoint at state zoom
//! level. The public instance allows **1 request per second**; callers are
//! responsible for pacing requests.
//!
//! The returned address is reduced to a single label by
//! [`state_codes::state_label`]: a two-letter code for the states in the
//! fixed lookup table, otherwise the raw state name or country code, or
//! `UNKNOWN`.

pub mod nominatim;
pub mod state_codes;

use std::time::Duration;

use thiserror::Error;

/// Public Nominatim reverse geocoding endpoint.
pub const DEFAULT_NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// `User-Agent` sent to Nominatim, which rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "TruckSimulation/1.0";

/// Default per-request timeout for reverse geocoding.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The address parts of a reverse geocoding result that matter for state
/// attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseAddress {
    /// `address.state` (e.g. "Pennsylvania").
    pub state: Option<String>,
    /// `address.country_code` (e.g. "us").
    pub country_code: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Builds an HTTP client suitable for Nominatim.
///
/// # Errors
///
/// Returns [`GeocodeError::Http`] if the client cannot be built.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, GeocodeError> {
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}
