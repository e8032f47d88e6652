#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory state boundary set for point-in-polygon classification.
//!
//! Loads named state polygons from a `GeoJSON` `FeatureCollection` once
//! at startup, builds an R-tree over their bounding boxes, and answers
//! "which state contains this point" lookups. The state name property is
//! normalized to [`STATE_NAME_FIELD`] at load time.

use std::path::Path;

use geo::{BoundingRect, Contains, MultiPolygon};
use geojson::{FeatureCollection, GeoJson, JsonObject};
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;
use truck_sim_trajectory_models::{Coordinate, UNKNOWN_STATE};

/// Canonical property holding the state name.
pub const STATE_NAME_FIELD: &str = "STATE_NAME";

/// Alternative name properties, in the order they are tried.
const NAME_ALIASES: &[&str] = &["NAME", "name"];

/// Errors from loading a boundary set.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The boundary file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Valid `GeoJSON`, but not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, got a {kind}")]
    NotFeatureCollection {
        /// What was found instead.
        kind: &'static str,
    },
}

/// A state polygon stored in the R-tree with its name and file position.
struct BoundaryEntry {
    order: usize,
    name: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Named state polygons with an R-tree index.
///
/// Loaded once and read-only afterwards.
pub struct StateBoundaries {
    index: RTree<BoundaryEntry>,
}

impl StateBoundaries {
    /// Loads a boundary set from a `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the file cannot be read or is not a
    /// `GeoJSON` `FeatureCollection`.
    pub fn load(path: &Path) -> Result<Self, SpatialError> {
        let content = std::fs::read_to_string(path)?;
        let boundaries = Self::from_geojson_str(&content)?;
        log::info!(
            "Loaded {} state boundaries from {}",
            boundaries.len(),
            path.display()
        );
        Ok(boundaries)
    }

    /// Parses a boundary set from `GeoJSON` text.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the text is not a `GeoJSON`
    /// `FeatureCollection`.
    pub fn from_geojson_str(content: &str) -> Result<Self, SpatialError> {
        match content.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => Ok(Self::from_feature_collection(collection)),
            GeoJson::Feature(_) => Err(SpatialError::NotFeatureCollection { kind: "Feature" }),
            GeoJson::Geometry(_) => Err(SpatialError::NotFeatureCollection { kind: "Geometry" }),
        }
    }

    /// Builds the index from a parsed `FeatureCollection`.
    ///
    /// Features without polygonal geometry are skipped with a warning.
    /// Features without any name property are kept and labelled
    /// [`UNKNOWN_STATE`].
    #[must_use]
    pub fn from_feature_collection(collection: FeatureCollection) -> Self {
        let mut entries = Vec::with_capacity(collection.features.len());

        for (order, feature) in collection.features.into_iter().enumerate() {
            let mut properties = feature.properties.unwrap_or_default();
            normalize_name_property(&mut properties);
            let name = properties
                .get(STATE_NAME_FIELD)
                .and_then(serde_json::Value::as_str)
                .unwrap_or(UNKNOWN_STATE)
                .to_string();

            let Some(polygon) = feature.geometry.and_then(to_multipolygon) else {
                log::warn!("Skipping boundary feature {order} ({name}): not a polygon");
                continue;
            };

            let envelope = compute_envelope(&polygon);
            entries.push(BoundaryEntry {
                order,
                name,
                envelope,
                polygon,
            });
        }

        Self {
            index: RTree::bulk_load(entries),
        }
    }

    /// Name of the first polygon, in file order, that contains `coord`.
    ///
    /// Points exactly on a polygon edge are not contained.
    #[must_use]
    pub fn lookup(&self, coord: Coordinate) -> Option<&str> {
        let point = geo::Point::new(coord.lon, coord.lat);
        let query_env = AABB::from_point([coord.lon, coord.lat]);

        self.index
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.contains(&point))
            .min_by_key(|entry| entry.order)
            .map(|entry| entry.name.as_str())
    }

    /// Number of indexed polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Whether no polygons were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }
}

/// Copies the first alias name property (`NAME`, then `name`) into
/// [`STATE_NAME_FIELD`], removing the alias. An existing
/// [`STATE_NAME_FIELD`] is left untouched.
pub fn normalize_name_property(properties: &mut JsonObject) {
    if properties.contains_key(STATE_NAME_FIELD) {
        return;
    }
    for alias in NAME_ALIASES {
        if let Some(value) = properties.remove(*alias) {
            properties.insert(STATE_NAME_FIELD.to_string(), value);
            return;
        }
    }
}

/// Converts `Polygon` and `MultiPolygon` geometries; anything else is
/// `None`.
fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
