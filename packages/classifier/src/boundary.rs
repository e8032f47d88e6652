//! Point-in-polygon classification against a local state boundary set.

use std::path::Path;

use truck_sim_spatial::StateBoundaries;
use truck_sim_trajectory_models::{Coordinate, UNKNOWN_STATE};

use crate::StateClassifier;

/// Labels points with the name of the first boundary polygon containing
/// them.
///
/// Holds no boundary set when loading failed, in which case every point
/// is `UNKNOWN`.
pub struct BoundaryClassifier {
    boundaries: Option<StateBoundaries>,
}

impl BoundaryClassifier {
    /// Loads the boundary file at `path`.
    ///
    /// A missing or malformed file is logged and yields a classifier that
    /// answers `UNKNOWN` for every point.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        match StateBoundaries::load(path) {
            Ok(boundaries) => Self::from_boundaries(boundaries),
            Err(e) => {
                log::warn!(
                    "Could not load state boundaries from {}: {e}",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    /// Wraps an already loaded boundary set.
    #[must_use]
    pub const fn from_boundaries(boundaries: StateBoundaries) -> Self {
        Self {
            boundaries: Some(boundaries),
        }
    }

    /// A classifier without boundaries.
    #[must_use]
    pub const fn empty() -> Self {
        Self { boundaries: None }
    }

    /// Whether a boundary set is loaded.
    #[must_use]
    pub const fn has_boundaries(&self) -> bool {
        self.boundaries.is_some()
    }
}

#[async_trait::async_trait]
impl StateClassifier for BoundaryClassifier {
    fn name(&self) -> &'static str {
        "boundaries"
    }

    async fn classify(&self, coord: Coordinate) -> String {
        self.boundaries
            .as_ref()
            .and_then(|b| b.lookup(coord))
            .unwrap_or(UNKNOWN_STATE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "STATE_NAME": "Pennsylvania" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-80.5, 39.7], [-74.7, 39.7], [-74.7, 42.3], [-80.5, 42.3], [-80.5, 39.7]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "New Jersey" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-75.6, 38.9], [-73.9, 38.9], [-73.9, 41.4], [-75.6, 41.4], [-75.6, 38.9]]]
                }
            }
        ]
    }"#;

    fn classifier() -> BoundaryClassifier {
        BoundaryClassifier::from_boundaries(StateBoundaries::from_geojson_str(TWO_STATES).unwrap())
    }

    #[tokio::test]
    async fn labels_point_inside_polygon() {
        let label = classifier().classify(Coordinate::new(40.3, -76.9)).await;
        assert_eq!(label, "Pennsylvania");
    }

    #[tokio::test]
    async fn overlap_takes_first_feature() {
        // lon -75.0 is inside both rectangles.
        let label = classifier().classify(Coordinate::new(40.0, -75.0)).await;
        assert_eq!(label, "Pennsylvania");
    }

    #[tokio::test]
    async fn alias_name_is_used() {
        let label = classifier().classify(Coordinate::new(39.2, -74.2)).await;
        assert_eq!(label, "New Jersey");
    }

    #[tokio::test]
    async fn outside_every_polygon_is_unknown() {
        let label = classifier().classify(Coordinate::new(29.8, -95.4)).await;
        assert_eq!(label, UNKNOWN_STATE);
    }

    #[tokio::test]
    async fn loads_boundary_file() {
        let path = std::env::temp_dir().join("truck_sim_boundary_classifier.geojson");
        std::fs::write(&path, TWO_STATES).unwrap();
        let classifier = BoundaryClassifier::load_or_empty(&path);
        std::fs::remove_file(&path).ok();

        assert!(classifier.has_boundaries());
        let label = classifier.classify(Coordinate::new(39.2, -74.2)).await;
        assert_eq!(label, "New Jersey");
    }

    #[tokio::test]
    async fn missing_file_is_unknown() {
        let classifier = BoundaryClassifier::load_or_empty(Path::new("/nonexistent/states.geojson"));
        assert!(!classifier.has_boundaries());
        let label = classifier.classify(Coordinate::new(40.3, -76.9)).await;
        assert_eq!(label, UNKNOWN_STATE);
    }

    #[test]
    fn name_is_boundaries() {
        assert_eq!(BoundaryClassifier::empty().name(), "boundaries");
    }
}
