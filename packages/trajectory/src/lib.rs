#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Truck trajectory generation between US metro areas.
//!
//! The pipeline is:
//!
//! 1. Look up both metros in the [`registry::MetroRegistry`].
//! 2. Ask a [`truck_sim_router::RouteFetcher`] for road geometry.
//! 3. [`resample::resample`] the polyline to one point per minute, or,
//!    if routing failed, synthesize a straight line at 80 km/h with
//!    [`resample::interpolate_linear`].
//! 4. Derive per-minute speeds with [`speed::instantaneous_speeds`] and
//!    smooth them with [`speed::rolling_mean`].
//!
//! State classification of the resulting points lives in
//! `truck_sim_classifier` and is independent of this crate.

pub mod generator;
pub mod geodesy;
pub mod registry;
pub mod resample;
pub mod speed;

use thiserror::Error;
use truck_sim_trajectory_models::CoordinateError;

/// Errors from trajectory generation and registry loading.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// A requested metro name is not in the registry.
    #[error("Metro region not found: {name}")]
    UnknownMetro {
        /// The name that was requested.
        name: String,
    },

    /// The registry file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry file is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A registry entry has an out-of-range coordinate.
    #[error("Invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),

    /// The registry content violates an invariant (duplicate or empty
    /// names).
    #[error("Invalid metro registry: {message}")]
    InvalidRegistry {
        /// Description of the problem.
        message: String,
    },
}
