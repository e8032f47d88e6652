#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, trajectory, and metro registry types.
//!
//! These are plain data types shared by the routing, classification, and
//! trajectory generation crates. They carry no behavior beyond validation
//! of the WGS84 coordinate ranges.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label returned by every state classifier when a point cannot be
/// attributed to a state.
pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, `-90.0..=90.0`.
    pub lat: f64,
    /// Longitude, `-180.0..=180.0`.
    pub lon: f64,
}

/// Errors from constructing model values.
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    /// Latitude or longitude is outside the WGS84 range or not finite.
    #[error("Coordinate out of range: ({lat}, {lon})")]
    OutOfRange {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
}

impl Coordinate {
    /// Creates a coordinate without range checks.
    ///
    /// Router geometry and interpolated points go through this; use
    /// [`Self::try_new`] for values read from user-supplied files.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a coordinate, rejecting values outside the WGS84 range.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::OutOfRange`] if either component is
    /// non-finite or out of range.
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        let coord = Self { lat, lon };
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(CoordinateError::OutOfRange { lat, lon })
        }
    }

    /// Whether both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Which routing backend produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterBackend {
    /// OSRM `route/v1` service.
    Osrm,
    /// Valhalla `route` service.
    Valhalla,
}

impl std::fmt::Display for RouterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Osrm => f.write_str("osrm"),
            Self::Valhalla => f.write_str("valhalla"),
        }
    }
}

/// Where a trajectory's geometry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteSource {
    /// Road geometry from a routing service, resampled per minute.
    Router {
        /// The backend that answered.
        backend: RouterBackend,
    },
    /// Straight-line interpolation between the endpoints at 80 km/h.
    Fallback,
}

/// A per-minute truck trajectory between two metro areas.
///
/// Built once per route request and never mutated afterwards, so the
/// fields are only exposed through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trajectory {
    start_metro: String,
    end_metro: String,
    distance_km: f64,
    duration_minutes: u32,
    avg_speed_kmh: f64,
    route_source: RouteSource,
    route_points: Vec<Coordinate>,
}

impl Trajectory {
    /// Assembles a trajectory from its parts.
    #[must_use]
    pub const fn new(
        start_metro: String,
        end_metro: String,
        distance_km: f64,
        duration_minutes: u32,
        avg_speed_kmh: f64,
        route_source: RouteSource,
        route_points: Vec<Coordinate>,
    ) -> Self {
        Self {
            start_metro,
            end_metro,
            distance_km,
            duration_minutes,
            avg_speed_kmh,
            route_source,
            route_points,
        }
    }

    /// Name of the origin metro.
    #[must_use]
    pub fn start_metro(&self) -> &str {
        &self.start_metro
    }

    /// Name of the destination metro.
    #[must_use]
    pub fn end_metro(&self) -> &str {
        &self.end_metro
    }

    /// Route length in kilometres.
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Whole minutes of travel; there are `duration_minutes + 1` points.
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Nominal average speed assigned to the truck.
    #[must_use]
    pub const fn avg_speed_kmh(&self) -> f64 {
        self.avg_speed_kmh
    }

    /// Router backend or fallback that produced the geometry.
    #[must_use]
    pub const fn route_source(&self) -> RouteSource {
        self.route_source
    }

    /// One point per minute of travel.
    #[must_use]
    pub fn route_points(&self) -> &[Coordinate] {
        &self.route_points
    }
}

/// A single metro area entry in the registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetroEntry {
    /// Unique metro name (e.g. "Chicago").
    pub name: String,
    /// Latitude of the metro centre.
    pub lat: f64,
    /// Longitude of the metro centre.
    pub lon: f64,
}

/// On-disk shape of the metro registry (`{"metros": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetroFile {
    /// All registered metros, in file order.
    pub metros: Vec<MetroEntry>,
}
