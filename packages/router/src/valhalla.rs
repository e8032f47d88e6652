//! Valhalla route client.
//!
//! Valhalla answers a JSON `POST /route` with a `trip` whose first leg
//! carries the encoded shape (precision 6) and a summary with `length` in
//! kilometres and `time` in seconds.
//!
//! See <https://valhalla.github.io/valhalla/api/turn-by-turn/api-reference/>

use serde::Deserialize;
use truck_sim_trajectory_models::{Coordinate, RouterBackend};

use crate::{RouteFetcher, RouteResult, RouterError, polyline};

/// Valhalla encodes shapes with six decimal places.
const SHAPE_PRECISION: u32 = 6;

/// Route fetcher backed by a Valhalla instance.
pub struct ValhallaRouter {
    client: reqwest::Client,
    base_url: String,
    costing: String,
}

impl ValhallaRouter {
    /// Creates a router for the Valhalla server at `base_url` using the
    /// given costing model (e.g. `"auto"`, `"truck"`).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String, costing: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            costing,
        }
    }

    fn request_body(&self, start: Coordinate, end: Coordinate) -> serde_json::Value {
        serde_json::json!({
            "locations": [
                { "lat": start.lat, "lon": start.lon },
                { "lat": end.lat, "lon": end.lon }
            ],
            "costing": self.costing,
            "directions_options": { "units": "kilometers" }
        })
    }
}

#[async_trait::async_trait]
impl RouteFetcher for ValhallaRouter {
    fn backend(&self) -> RouterBackend {
        RouterBackend::Valhalla
    }

    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteResult, RouterError> {
        let url = format!("{}/route", self.base_url);
        log::debug!("Valhalla request: {url} {start} -> {end}");

        let resp = self
            .client
            .post(&url)
            .json(&self.request_body(start, end))
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        parse_response(body)
    }
}

#[derive(Deserialize)]
struct ValhallaResponse {
    trip: Option<Trip>,
}

#[derive(Deserialize)]
struct Trip {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct Leg {
    shape: String,
    summary: Summary,
}

#[derive(Deserialize)]
struct Summary {
    /// Kilometres, since the request asks for `units: kilometers`.
    length: f64,
    /// Seconds.
    time: f64,
}

/// Parses a Valhalla `route` response into a [`RouteResult`].
fn parse_response(body: serde_json::Value) -> Result<RouteResult, RouterError> {
    let response: ValhallaResponse =
        serde_json::from_value(body).map_err(|e| RouterError::Parse {
            message: format!("Unexpected Valhalla response: {e}"),
        })?;

    let Some(leg) = response
        .trip
        .and_then(|trip| trip.legs.into_iter().next())
    else {
        return Err(RouterError::NoRoute {
            message: "Valhalla returned no trip legs".to_string(),
        });
    };

    let points = polyline::decode(&leg.shape, SHAPE_PRECISION)?;

    RouteResult {
        points,
        distance_km: leg.summary.length,
        duration_hours: leg.summary.time / 3600.0,
    }
    .validate()
}
