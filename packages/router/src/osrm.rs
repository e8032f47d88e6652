//! OSRM route client.
//!
//! Requests full-overview `GeoJSON` geometry so that every road vertex is
//! available to the per-minute resampler. OSRM reports distance in metres
//! and duration in seconds; coordinates come back as `[lon, lat]`.
//!
//! See <https://project-osrm.org/docs/v5.24.0/api/#route-service>

use truck_sim_trajectory_models::{Coordinate, RouterBackend};

use crate::{RouteFetcher, RouteResult, RouterError};

/// Route fetcher backed by an OSRM instance.
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmRouter {
    /// Creates a router for the OSRM server at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, start.lon, start.lat, end.lon, end.lat
        )
    }
}

#[async_trait::async_trait]
impl RouteFetcher for OsrmRouter {
    fn backend(&self) -> RouterBackend {
        RouterBackend::Osrm
    }

    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteResult, RouterError> {
        let url = self.route_url(start, end);
        log::debug!("OSRM request: {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "true"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses an OSRM `route` response into a [`RouteResult`].
fn parse_response(body: &serde_json::Value) -> Result<RouteResult, RouterError> {
    let code = body["code"].as_str().unwrap_or_default();
    if code != "Ok" {
        return Err(RouterError::NoRoute {
            message: format!(
                "OSRM returned code {code:?}: {}",
                body["message"].as_str().unwrap_or("no message")
            ),
        });
    }

    let Some(route) = body["routes"].as_array().and_then(|routes| routes.first()) else {
        return Err(RouterError::NoRoute {
            message: "OSRM returned no routes".to_string(),
        });
    };

    let coordinates = route["geometry"]["coordinates"]
        .as_array()
        .ok_or_else(|| RouterError::Parse {
            message: "Missing geometry.coordinates in OSRM route".to_string(),
        })?;

    let points = coordinates
        .iter()
        .map(|pair| {
            let lon = pair[0].as_f64();
            let lat = pair[1].as_f64();
            match (lat, lon) {
                (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
                _ => Err(RouterError::Parse {
                    message: format!("Malformed OSRM coordinate: {pair}"),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let distance_m = route["distance"].as_f64().ok_or_else(|| RouterError::Parse {
        message: "Missing distance in OSRM route".to_string(),
    })?;

    let duration_s = route["duration"].as_f64().ok_or_else(|| RouterError::Parse {
        message: "Missing duration in OSRM route".to_string(),
    })?;

    RouteResult {
        points,
        distance_km: distance_m / 1000.0,
        duration_hours: duration_s / 3600.0,
    }
    .validate()
}
