//! Nominatim / `OpenStreetMap` reverse geocoder client.
//!
//! Queries at `zoom=3` (state level) with address details so the answer
//! carries `address.state` and `address.country_code`.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use truck_sim_trajectory_models::Coordinate;

use crate::{GeocodeError, ReverseAddress};

/// Reverse geocodes a single coordinate.
///
/// The caller is responsible for rate limiting (typically 1 request per
/// second for the public instance).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request fails, the server rate
/// limits the client, or the response is not a JSON object.
pub async fn reverse(
    client: &reqwest::Client,
    base_url: &str,
    coord: Coordinate,
) -> Result<ReverseAddress, GeocodeError> {
    let lat = coord.lat.to_string();
    let lon = coord.lon.to_string();

    let resp = client
        .get(base_url)
        .query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("format", "json"),
            ("addressdetails", "1"),
            ("zoom", "3"),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.error_for_status()?.json().await?;
    parse_response(&body)
}

/// Parses a Nominatim reverse response.
///
/// Nominatim answers points it cannot place (oceans, poles) with
/// `{"error": "Unable to geocode"}`; that yields an empty address rather
/// than an error.
fn parse_response(body: &serde_json::Value) -> Result<ReverseAddress, GeocodeError> {
    if !body.is_object() {
        return Err(GeocodeError::Parse {
            message: "Nominatim response is not an object".to_string(),
        });
    }

    if let Some(error) = body["error"].as_str() {
        log::debug!("Nominatim reverse returned error: {error}");
    }

    let address = &body["address"];
    Ok(ReverseAddress {
        state: non_empty(address["state"].as_str()),
        country_code: non_empty(address["country_code"].as_str()),
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_state_and_country() {
        let body = serde_json::json!({
            "place_id": 123,
            "display_name": "Pennsylvania, United States",
            "address": {
                "state": "Pennsylvania",
                "ISO3166-2-lvl4": "US-PA",
                "country": "United States",
                "country_code": "us"
            }
        });
        let address = parse_response(&body).unwrap();
        assert_eq!(address.state.as_deref(), Some("Pennsylvania"));
        assert_eq!(address.country_code.as_deref(), Some("us"));
    }

    #[test]
    fn unable_to_geocode_is_empty_address() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert_eq!(parse_response(&body).unwrap(), ReverseAddress::default());
    }

    #[test]
    fn blank_values_are_dropped() {
        let body = serde_json::json!({ "address": { "state": "  ", "country_code": "ca" } });
        let address = parse_response(&body).unwrap();
        assert_eq!(address.state, None);
        assert_eq!(address.country_code.as_deref(), Some("ca"));
    }

    #[test]
    fn non_object_is_parse_error() {
        let body = serde_json::json!([]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
