//! Encoded polyline decoding.
//!
//! Valhalla encodes route shapes with the Google polyline algorithm at
//! precision 6 (OSRM's default is 5). Each value is a zig-zag encoded
//! delta from the previous point, split into 5-bit chunks offset by 63.
//!
//! See <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>

use truck_sim_trajectory_models::Coordinate;

use crate::RouterError;

/// Decodes an encoded polyline into `(lat, lon)` coordinates.
///
/// # Errors
///
/// Returns [`RouterError::Parse`] if the string contains bytes outside the
/// encoding alphabet, ends in the middle of a value, or encodes values
/// that do not fit in 64 bits.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, RouterError> {
    let factor = 10_f64.powi(i32::try_from(precision).map_err(|_| RouterError::Parse {
        message: format!("Polyline precision {precision} too large"),
    })?);

    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while pos < bytes.len() {
        lat = accumulate(lat, next_delta(bytes, &mut pos)?)?;
        lon = accumulate(lon, next_delta(bytes, &mut pos)?)?;
        #[allow(clippy::cast_precision_loss)]
        points.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor));
    }

    Ok(points)
}

fn accumulate(total: i64, delta: i64) -> Result<i64, RouterError> {
    total.checked_add(delta).ok_or_else(overflow)
}

fn overflow() -> RouterError {
    RouterError::Parse {
        message: "Polyline value overflow".to_string(),
    }
}

/// Reads one zig-zag encoded varint starting at `pos`.
fn next_delta(bytes: &[u8], pos: &mut usize) -> Result<i64, RouterError> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*pos) else {
            return Err(RouterError::Parse {
                message: "Truncated polyline".to_string(),
            });
        };
        *pos += 1;

        if !(63..127).contains(&byte) {
            return Err(RouterError::Parse {
                message: format!("Invalid polyline byte {byte:#04x} at offset {}", *pos - 1),
            });
        }

        let chunk = u64::from(byte - 63);
        let bits = chunk & 0x1f;
        // Only 4 bits remain above shift 60.
        if shift > 60 || (shift == 60 && bits > 0xf) {
            return Err(overflow());
        }
        result |= bits << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    let magnitude = i64::try_from(result >> 1).map_err(|_| overflow())?;
    Ok(if result & 1 == 1 {
        !magnitude
    } else {
        magnitude
    })
}
