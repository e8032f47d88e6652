#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road routing clients for truck trajectory generation.
//!
//! Two backends are supported behind the [`RouteFetcher`] trait:
//!
//! 1. **OSRM**: `GET /route/v1/driving/...` returning `GeoJSON` geometry.
//! 2. **Valhalla**: `POST /route` returning an encoded polyline
//!    (precision 6).
//!
//! Both payload shapes are reconciled into a single [`RouteResult`] at the
//! fetch boundary. The backend is chosen from a [`config::RouterConfig`]
//! via [`create_router`]. Callers treat every [`RouterError`] as "no road
//! geometry available" and fall back to straight-line interpolation.

pub mod config;
pub mod osrm;
pub mod polyline;
pub mod valhalla;

use std::time::Duration;

use thiserror::Error;
use truck_sim_trajectory_models::{Coordinate, RouterBackend};

use crate::config::RouterConfig;

/// A road route between two coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Ordered `(lat, lon)` geometry, at least two points.
    pub points: Vec<Coordinate>,
    /// Route length in kilometres.
    pub distance_km: f64,
    /// Expected travel time in hours.
    pub duration_hours: f64,
}

impl RouteResult {
    /// Checks the route contract: at least two points, every point within
    /// latitude/longitude range, and positive, finite distance and
    /// duration.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidRoute`] if the contract is broken.
    pub fn validate(self) -> Result<Self, RouterError> {
        if self.points.len() < 2 {
            return Err(RouterError::InvalidRoute {
                message: format!("route has {} point(s), need at least 2", self.points.len()),
            });
        }
        if let Some(point) = self.points.iter().find(|p| !p.is_valid()) {
            return Err(RouterError::InvalidRoute {
                message: format!("route point out of range: {point}"),
            });
        }
        if !(self.distance_km.is_finite() && self.distance_km > 0.0) {
            return Err(RouterError::InvalidRoute {
                message: format!("non-positive route distance: {} km", self.distance_km),
            });
        }
        if !(self.duration_hours.is_finite() && self.duration_hours > 0.0) {
            return Err(RouterError::InvalidRoute {
                message: format!("non-positive route duration: {} h", self.duration_hours),
            });
        }
        Ok(self)
    }
}

/// Errors from routing operations.
#[derive(Debug, Error)]
pub enum RouterError {
    /// HTTP request failed (connection, timeout, or error status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The service answered but found no route.
    #[error("No route found: {message}")]
    NoRoute {
        /// Service-provided detail.
        message: String,
    },

    /// The route violates the result contract (too few points, a point
    /// out of range, zero distance or duration).
    #[error("Invalid route: {message}")]
    InvalidRoute {
        /// Which part of the contract failed.
        message: String,
    },
}

/// A road routing service.
#[async_trait::async_trait]
pub trait RouteFetcher: Send + Sync {
    /// Which backend this fetcher talks to.
    fn backend(&self) -> RouterBackend;

    /// Fetches a driving route from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] if the request fails, times out, finds no
    /// route, or returns a malformed payload.
    async fn fetch_route(&self, start: Coordinate, end: Coordinate)
    -> Result<RouteResult, RouterError>;
}

/// Builds the route fetcher described by `config`.
///
/// # Errors
///
/// Returns [`RouterError::Http`] if the HTTP client cannot be built.
pub fn create_router(config: &RouterConfig) -> Result<Box<dyn RouteFetcher>, RouterError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs()))
        .build()?;

    log::info!(
        "Using {} router at {}",
        config.backend(),
        config.base_url()
    );

    let router: Box<dyn RouteFetcher> = match config {
        RouterConfig::Osrm { base_url, .. } => {
            Box::new(osrm::OsrmRouter::new(client, base_url.clone()))
        }
        RouterConfig::Valhalla {
            base_url, costing, ..
        } => Box::new(valhalla::ValhallaRouter::new(
            client,
            base_url.clone(),
            costing.clone(),
        )),
    };
    Ok(router)
}
