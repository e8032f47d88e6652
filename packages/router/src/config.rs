//! Router backend configuration.
//!
//! Deserialized from the `[router]` table of the `truck_sim` TOML config,
//! tagged by `type`:
//!
//! ```toml
//! [router]
//! type = "valhalla"
//! base_url = "http://localhost:8002"
//! costing = "auto"
//! ```

use serde::{Deserialize, Serialize};
use truck_sim_trajectory_models::RouterBackend;

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Which router to call and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouterConfig {
    /// OSRM `route/v1/driving` service.
    Osrm {
        /// Base URL without trailing slash.
        #[serde(default = "default_osrm_url")]
        base_url: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// Valhalla `route` service.
    Valhalla {
        /// Base URL without trailing slash (e.g. `"http://localhost:8002"`).
        base_url: String,
        /// Valhalla costing model.
        #[serde(default = "default_costing")]
        costing: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_osrm_url() -> String {
    DEFAULT_OSRM_URL.to_string()
}

fn default_costing() -> String {
    "auto".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::Osrm {
            base_url: default_osrm_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RouterConfig {
    /// The backend this configuration selects.
    #[must_use]
    pub const fn backend(&self) -> RouterBackend {
        match self {
            Self::Osrm { .. } => RouterBackend::Osrm,
            Self::Valhalla { .. } => RouterBackend::Valhalla,
        }
    }

    /// Returns the service base URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match self {
            Self::Osrm { base_url, .. } | Self::Valhalla { base_url, .. } => base_url,
        }
    }

    /// Returns the per-request timeout regardless of variant.
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        match self {
            Self::Osrm { timeout_secs, .. } | Self::Valhalla { timeout_secs, .. } => *timeout_secs,
        }
    }

    /// Replaces the service base URL.
    pub fn set_base_url(&mut self, url: String) {
        match self {
            Self::Osrm { base_url, .. } | Self::Valhalla { base_url, .. } => *base_url = url,
        }
    }

    /// Switches to `backend`, keeping the timeout. The base URL is kept
    /// when the backend does not change; otherwise it resets to the
    /// backend's default (Valhalla has none, so it stays as-is).
    #[must_use]
    pub fn with_backend(self, backend: RouterBackend) -> Self {
        if self.backend() == backend {
            return self;
        }
        let timeout_secs = self.timeout_secs();
        match backend {
            RouterBackend::Osrm => Self::Osrm {
                base_url: default_osrm_url(),
                timeout_secs,
            },
            RouterBackend::Valhalla => Self::Valhalla {
                base_url: self.base_url().to_string(),
                costing: default_costing(),
                timeout_secs,
            },
        }
    }
}
