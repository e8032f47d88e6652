//! Per-minute speed derivation.
//!
//! Consecutive trajectory points are one minute apart, so the distance
//! between them in km times 60 is the speed in km/h over that minute.

use truck_sim_trajectory_models::{Coordinate, Trajectory};

use crate::geodesy::great_circle_km;

/// Default centred window for [`rolling_mean`].
pub const DEFAULT_ROLLING_WINDOW: usize = 5;

/// Speed in km/h between each pair of adjacent one-minute points.
///
/// Returns `len - 1` values; empty for fewer than two points.
#[must_use]
pub fn instantaneous_speeds(points: &[Coordinate]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| great_circle_km(pair[0], pair[1]) * 60.0)
        .collect()
}

/// Centred rolling mean over `window` samples.
///
/// Index `i` averages `[i - window/2, i + window/2 + 1)` clipped to the
/// slice bounds, so windows shrink near the edges instead of padding.
/// Sequences shorter than `window` are returned unsmoothed.
#[must_use]
pub fn rolling_mean(speeds: &[f64], window: usize) -> Vec<f64> {
    if speeds.len() < window {
        return speeds.to_vec();
    }

    let half = window / 2;
    (0..speeds.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(speeds.len());
            let slice = &speeds[start..end];
            #[allow(clippy::cast_precision_loss)]
            let count = slice.len() as f64;
            slice.iter().sum::<f64>() / count
        })
        .collect()
}

/// Speed helpers on a generated [`Trajectory`].
pub trait TrajectorySpeeds {
    /// [`instantaneous_speeds`] over the trajectory's points.
    fn per_minute_speeds(&self) -> Vec<f64>;

    /// [`rolling_mean`] of [`Self::per_minute_speeds`].
    fn rolling_mean_speeds(&self, window: usize) -> Vec<f64> {
        rolling_mean(&self.per_minute_speeds(), window)
    }
}

impl TrajectorySpeeds for Trajectory {
    fn per_minute_speeds(&self) -> Vec<f64> {
        instantaneous_speeds(self.route_points())
    }
}
