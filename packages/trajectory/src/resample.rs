//! Per-minute resampling and straight-line interpolation.
//!
//! [`resample`] only ever picks existing vertices of a router polyline;
//! [`interpolate_linear`] synthesizes new coordinates between two
//! endpoints and is used solely when no road geometry is available.

use truck_sim_trajectory_models::Coordinate;

/// Samples `points` at one vertex per minute of travel.
///
/// Minute `m` takes the vertex at `floor(m / total_minutes * (len - 1))`,
/// computed in integer arithmetic and clamped to the last index, so the
/// output has `total_minutes + 1` points whose first and last elements are
/// the input's first and last.
/// With `total_minutes == 0` the output is the first point alone.
///
/// Inputs with at most one point are returned unchanged.
#[must_use]
pub fn resample(points: &[Coordinate], total_minutes: u32) -> Vec<Coordinate> {
    if points.len() <= 1 {
        return points.to_vec();
    }
    if total_minutes == 0 {
        return vec![points[0]];
    }

    let last = points.len() - 1;
    let span = last as u128;
    let total = u128::from(total_minutes);

    // Exact floor of `minute / total * span`. Floating point rounds some
    // ratios just below an integer, which would break idempotence.
    (0..=total_minutes)
        .map(|minute| {
            let idx = usize::try_from(u128::from(minute) * span / total).unwrap_or(last);
            points[idx.min(last)]
        })
        .collect()
}

/// Linearly interpolates `total_minutes + 1` points from `start` to `end`.
///
/// Latitude and longitude are blended independently by `m / total_minutes`.
/// The first point is exactly `start` and the last exactly `end`; with
/// `total_minutes == 0` the single output point is `start`.
#[must_use]
pub fn interpolate_linear(
    start: Coordinate,
    end: Coordinate,
    total_minutes: u32,
) -> Vec<Coordinate> {
    if total_minutes == 0 {
        return vec![start];
    }

    let total = f64::from(total_minutes);
    (0..=total_minutes)
        .map(|minute| {
            if minute == total_minutes {
                return end;
            }
            let ratio = f64::from(minute) / total;
            Coordinate::new(
                (end.lat - start.lat).mul_add(ratio, start.lat),
                (end.lon - start.lon).mul_add(ratio, start.lon),
            )
        })
        .collect()
}
