//! Reduction of a reverse-geocoded address to a state label.

use truck_sim_trajectory_models::UNKNOWN_STATE;

use crate::ReverseAddress;

/// Lower-cased state names with a known two-letter code.
///
/// Deliberately partial. "washington" maps to "DC", so Washington state
/// and the District share a label.
pub const STATE_CODES: &[(&str, &str)] = &[
    ("california", "CA"),
    ("texas", "TX"),
    ("florida", "FL"),
    ("new york", "NY"),
    ("pennsylvania", "PA"),
    ("illinois", "IL"),
    ("georgia", "GA"),
    ("massachusetts", "MA"),
    ("washington", "DC"),
];

/// Two-letter code for `name`, matched case-insensitively.
#[must_use]
pub fn state_code(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    STATE_CODES
        .iter()
        .find(|(state, _)| *state == lower)
        .map(|(_, code)| *code)
}

/// Label for an address.
///
/// Takes `state`, or the upper-cased `country_code` when there is no
/// state, and maps it through [`STATE_CODES`]. Unmapped values are
/// returned as-is; nothing at all yields [`UNKNOWN_STATE`].
#[must_use]
pub fn state_label(address: &ReverseAddress) -> String {
    let raw = address
        .state
        .clone()
        .or_else(|| address.country_code.as_deref().map(str::to_uppercase));

    match raw {
        Some(value) if !value.is_empty() => state_code(&value).map_or(value, String::from),
        _ => UNKNOWN_STATE.to_string(),
    }
}
