//! Metro area registry.
//!
//! Loaded once at startup from a JSON file of the form
//! `{"metros": [{"name": "Chicago", "lat": 41.88, "lon": -87.63}, ...]}`
//! and read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use truck_sim_trajectory_models::{Coordinate, MetroFile};

use crate::TrajectoryError;

/// Named metro centres, in file order.
#[derive(Debug, Clone, Default)]
pub struct MetroRegistry {
    names: Vec<String>,
    centres: BTreeMap<String, Coordinate>,
}

impl MetroRegistry {
    /// Reads and validates a registry file.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError`] if the file cannot be read or parsed,
    /// or any entry is invalid (see [`Self::from_file`]).
    pub fn load(path: &Path) -> Result<Self, TrajectoryError> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&content)?;
        log::info!(
            "Loaded {} metros from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Parses and validates registry JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::Json`] on malformed JSON, otherwise the
    /// errors of [`Self::from_file`].
    pub fn from_json_str(content: &str) -> Result<Self, TrajectoryError> {
        let file: MetroFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    /// Builds a registry from already-parsed entries.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidRegistry`] for empty or duplicate
    /// names and [`TrajectoryError::Coordinate`] for out-of-range
    /// coordinates.
    pub fn from_file(file: MetroFile) -> Result<Self, TrajectoryError> {
        let mut registry = Self::default();

        for entry in file.metros {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(TrajectoryError::InvalidRegistry {
                    message: "metro with empty name".to_string(),
                });
            }
            if registry.centres.contains_key(&name) {
                return Err(TrajectoryError::InvalidRegistry {
                    message: format!("duplicate metro name: {name}"),
                });
            }
            let centre = Coordinate::try_new(entry.lat, entry.lon)?;
            registry.centres.insert(name.clone(), centre);
            registry.names.push(name);
        }

        Ok(registry)
    }

    /// Centre of the named metro.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::UnknownMetro`] if `name` is not
    /// registered.
    pub fn centre(&self, name: &str) -> Result<Coordinate, TrajectoryError> {
        self.centres
            .get(name)
            .copied()
            .ok_or_else(|| TrajectoryError::UnknownMetro {
                name: name.to_string(),
            })
    }

    /// All metro names in file order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered metros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the registry has no metros.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Picks two distinct metros uniformly at random.
    ///
    /// Returns `None` when fewer than two metros are registered.
    pub fn random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&str, &str)> {
        let mut picked = self.names.choose_multiple(rng, 2);
        let start = picked.next()?;
        let end = picked.next()?;
        Some((start.as_str(), end.as_str()))
    }
}
