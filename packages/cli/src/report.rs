//! JSON output for `truck_sim generate`.

use serde::Serialize;
use truck_sim_trajectory::speed::TrajectorySpeeds;
use truck_sim_trajectory_models::Trajectory;

/// One generated trajectory with its derived series.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryReport {
    /// The generated trajectory.
    pub trajectory: Trajectory,
    /// Per-minute speeds, one fewer than the trajectory's points.
    pub speeds_kmh: Vec<f64>,
    /// Centred rolling mean of `speeds_kmh`.
    pub rolling_speeds_kmh: Vec<f64>,
    /// Per-point state labels, present when classification was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
}

impl TrajectoryReport {
    /// Derives the speed series for `trajectory`.
    #[must_use]
    pub fn new(trajectory: Trajectory, rolling_window: usize) -> Self {
        let speeds_kmh = trajectory.per_minute_speeds();
        let rolling_speeds_kmh = trajectory.rolling_mean_speeds(rolling_window);
        Self {
            trajectory,
            speeds_kmh,
            rolling_speeds_kmh,
            states: None,
        }
    }

    /// Attaches per-point state labels.
    #[must_use]
    pub fn with_states(mut self, states: Vec<String>) -> Self {
        self.states = Some(states);
        self
    }
}

#[cfg(test)]
mod tests {
    use truck_sim_trajectory::resample::interpolate_linear;
    use truck_sim_trajectory_models::{Coordinate, RouteSource};

    use super::*;

    fn trajectory() -> Trajectory {
        let points = interpolate_linear(Coordinate::new(40.0, -75.0), Coordinate::new(40.1, -75.0), 6);
        Trajectory::new(
            "A".to_string(),
            "B".to_string(),
            11.1,
            6,
            80.0,
            RouteSource::Fallback,
            points,
        )
    }

    #[test]
    fn derives_speed_series() {
        let report = TrajectoryReport::new(trajectory(), 3);
        assert_eq!(report.speeds_kmh.len(), 6);
        assert_eq!(report.rolling_speeds_kmh.len(), 6);
        assert!(report.states.is_none());
    }

    #[test]
    fn serializes_camel_case_without_states() {
        let value = serde_json::to_value(TrajectoryReport::new(trajectory(), 3)).unwrap();
        assert!(value.get("speedsKmh").is_some());
        assert!(value.get("rollingSpeedsKmh").is_some());
        assert!(value.get("states").is_none());
        assert_eq!(value["trajectory"]["startMetro"], "A");
        assert_eq!(value["trajectory"]["routeSource"]["kind"], "fallback");
    }

    #[test]
    fn includes_states_when_classified() {
        let states = vec!["PA".to_string(); 7];
        let value =
            serde_json::to_value(TrajectoryReport::new(trajectory(), 3).with_states(states))
                .unwrap();
        assert_eq!(value["states"].as_array().unwrap().len(), 7);
    }
}
