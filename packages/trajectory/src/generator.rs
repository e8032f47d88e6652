//! Trajectory generation between registered metros.
//!
//! A single generator serves every router backend: the backend is a
//! [`RouteFetcher`] trait object chosen from configuration. Router
//! failures never reach the caller; they degrade to a straight-line route
//! at [`FALLBACK_SPEED_KMH`].

use rand::Rng;
use truck_sim_router::{RouteFetcher, RouteResult};
use truck_sim_trajectory_models::{Coordinate, RouteSource, Trajectory};

use crate::TrajectoryError;
use crate::geodesy::great_circle_km;
use crate::registry::MetroRegistry;
use crate::resample::{interpolate_linear, resample};

/// Assumed cruise speed for straight-line fallback routes.
pub const FALLBACK_SPEED_KMH: f64 = 80.0;

/// Range of randomly assigned average truck speeds, in km/h.
pub const AVG_SPEED_RANGE_KMH: std::ops::Range<f64> = 70.0..95.0;

/// Draws an average truck speed uniformly from [`AVG_SPEED_RANGE_KMH`].
pub fn random_avg_speed<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(AVG_SPEED_RANGE_KMH)
}

/// Whole minutes in `hours`, rounded down. Non-finite or negative input
/// yields zero.
#[must_use]
pub fn whole_minutes(hours: f64) -> u32 {
    let minutes = (hours * 60.0).floor();
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = minutes.min(f64::from(u32::MAX)) as u32;
    minutes
}

/// Straight-line route at [`FALLBACK_SPEED_KMH`], already at one point per
/// minute.
#[must_use]
pub fn fallback_route(start: Coordinate, end: Coordinate) -> RouteResult {
    let distance_km = great_circle_km(start, end);
    let duration_hours = distance_km / FALLBACK_SPEED_KMH;
    RouteResult {
        points: interpolate_linear(start, end, whole_minutes(duration_hours)),
        distance_km,
        duration_hours,
    }
}

/// Generates per-minute trajectories using a configured router.
pub struct TrajectoryGenerator {
    registry: MetroRegistry,
    router: Box<dyn RouteFetcher>,
}

impl TrajectoryGenerator {
    /// Creates a generator over `registry` that routes with `router`.
    #[must_use]
    pub fn new(registry: MetroRegistry, router: Box<dyn RouteFetcher>) -> Self {
        Self { registry, router }
    }

    /// The metro registry this generator resolves names against.
    #[must_use]
    pub const fn registry(&self) -> &MetroRegistry {
        &self.registry
    }

    /// Generates one trajectory from `start_metro` to `end_metro`.
    ///
    /// Road geometry is resampled to `floor(duration_hours * 60) + 1`
    /// points. If the router fails for any reason the route is replaced by
    /// [`fallback_route`] and the trajectory is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::UnknownMetro`] if either name is not in
    /// the registry. No request is made in that case.
    pub async fn generate(
        &self,
        start_metro: &str,
        end_metro: &str,
        avg_speed_kmh: f64,
    ) -> Result<Trajectory, TrajectoryError> {
        let start = self.registry.centre(start_metro)?;
        let end = self.registry.centre(end_metro)?;

        let (route_source, distance_km, duration_minutes, points) =
            match self.router.fetch_route(start, end).await {
                Ok(route) => {
                    let minutes = whole_minutes(route.duration_hours);
                    log::debug!(
                        "{} route {start_metro} -> {end_metro}: {:.1} km, {minutes} min, {} vertices",
                        self.router.backend(),
                        route.distance_km,
                        route.points.len()
                    );
                    (
                        RouteSource::Router {
                            backend: self.router.backend(),
                        },
                        route.distance_km,
                        minutes,
                        resample(&route.points, minutes),
                    )
                }
                Err(e) => {
                    log::warn!(
                        "{} routing failed for {start_metro} -> {end_metro}: {e}; \
                         falling back to linear interpolation",
                        self.router.backend()
                    );
                    let route = fallback_route(start, end);
                    (
                        RouteSource::Fallback,
                        route.distance_km,
                        whole_minutes(route.duration_hours),
                        route.points,
                    )
                }
            };

        Ok(Trajectory::new(
            start_metro.to_string(),
            end_metro.to_string(),
            distance_km,
            duration_minutes,
            avg_speed_kmh,
            route_source,
            points,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use truck_sim_router::RouterError;
    use truck_sim_trajectory_models::RouterBackend;

    use super::*;

    const METROS_JSON: &str = r#"{
        "metros": [
            { "name": "A", "lat": 40.0, "lon": -75.0 },
            { "name": "B", "lat": 40.0, "lon": -74.0 }
        ]
    }"#;

    /// Router that always fails, counting calls.
    #[derive(Default)]
    struct FailingRouter {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RouteFetcher for FailingRouter {
        fn backend(&self) -> RouterBackend {
            RouterBackend::Osrm
        }

        async fn fetch_route(
            &self,
            _start: Coordinate,
            _end: Coordinate,
        ) -> Result<RouteResult, RouterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RouterError::NoRoute {
                message: "test".to_string(),
            })
        }
    }

    /// Router that returns a fixed zig-zag polyline.
    struct FixedRouter;

    #[async_trait::async_trait]
    impl RouteFetcher for FixedRouter {
        fn backend(&self) -> RouterBackend {
            RouterBackend::Valhalla
        }

        async fn fetch_route(
            &self,
            start: Coordinate,
            end: Coordinate,
        ) -> Result<RouteResult, RouterError> {
            Ok(RouteResult {
                points: vec![
                    start,
                    Coordinate::new(40.1, -74.8),
                    Coordinate::new(39.9, -74.5),
                    Coordinate::new(40.05, -74.2),
                    end,
                ],
                distance_km: 101.3,
                duration_hours: 1.262,
            })
        }
    }

    fn registry() -> MetroRegistry {
        MetroRegistry::from_json_str(METROS_JSON).unwrap()
    }

    #[tokio::test]
    async fn fallback_when_router_fails() {
        let generator = TrajectoryGenerator::new(registry(), Box::new(FailingRouter::default()));
        let trajectory = generator.generate("A", "B", 80.0).await.unwrap();

        let a = Coordinate::new(40.0, -75.0);
        let b = Coordinate::new(40.0, -74.0);
        let expected_hours = great_circle_km(a, b) / FALLBACK_SPEED_KMH;

        assert_eq!(trajectory.route_source(), RouteSource::Fallback);
        assert!((trajectory.distance_km() - great_circle_km(a, b)).abs() < 1e-12);
        assert_eq!(trajectory.duration_minutes(), whole_minutes(expected_hours));
        assert_eq!(trajectory.duration_minutes(), 63);
        assert_eq!(trajectory.route_points().len(), 64);
        assert_eq!(trajectory.route_points()[0], a);
        assert_eq!(*trajectory.route_points().last().unwrap(), b);
    }

    #[test]
    fn fallback_route_duration_uses_80_kmh() {
        let a = Coordinate::new(40.0, -75.0);
        let b = Coordinate::new(40.0, -74.0);
        let route = fallback_route(a, b);
        assert!((route.duration_hours - great_circle_km(a, b) / 80.0).abs() < 1e-12);
        assert_eq!(route.points[0], a);
        assert_eq!(*route.points.last().unwrap(), b);
    }

    #[tokio::test]
    async fn resamples_router_geometry() {
        let generator = TrajectoryGenerator::new(registry(), Box::new(FixedRouter));
        let trajectory = generator.generate("A", "B", 85.0).await.unwrap();

        assert_eq!(
            trajectory.route_source(),
            RouteSource::Router {
                backend: RouterBackend::Valhalla
            }
        );
        // 1.262 h = 75.72 min -> 75 whole minutes.
        assert_eq!(trajectory.duration_minutes(), 75);
        assert_eq!(trajectory.route_points().len(), 76);
        assert_eq!(trajectory.route_points()[0], Coordinate::new(40.0, -75.0));
        assert_eq!(
            *trajectory.route_points().last().unwrap(),
            Coordinate::new(40.0, -74.0)
        );
        assert!((trajectory.distance_km() - 101.3).abs() < f64::EPSILON);
        assert!((trajectory.avg_speed_kmh() - 85.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_metro_fails_before_routing() {
        let router = std::sync::Arc::new(FailingRouter::default());

        struct Shared(std::sync::Arc<FailingRouter>);

        #[async_trait::async_trait]
        impl RouteFetcher for Shared {
            fn backend(&self) -> RouterBackend {
                self.0.backend()
            }

            async fn fetch_route(
                &self,
                start: Coordinate,
                end: Coordinate,
            ) -> Result<RouteResult, RouterError> {
                self.0.fetch_route(start, end).await
            }
        }

        let generator = TrajectoryGenerator::new(registry(), Box::new(Shared(router.clone())));
        let result = generator.generate("A", "Nowhere", 80.0).await;
        assert!(matches!(result, Err(TrajectoryError::UnknownMetro { name }) if name == "Nowhere"));
        let result = generator.generate("Nowhere", "B", 80.0).await;
        assert!(matches!(result, Err(TrajectoryError::UnknownMetro { .. })));
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn same_start_and_end_falls_back_to_single_point() {
        let generator = TrajectoryGenerator::new(registry(), Box::new(FailingRouter::default()));
        let trajectory = generator.generate("A", "A", 80.0).await.unwrap();
        assert_eq!(trajectory.duration_minutes(), 0);
        assert_eq!(trajectory.route_points(), [Coordinate::new(40.0, -75.0)]);
    }

    #[test]
    fn whole_minutes_rounds_down() {
        assert_eq!(whole_minutes(1.0), 60);
        assert_eq!(whole_minutes(1.262), 75);
        assert_eq!(whole_minutes(0.0), 0);
        assert_eq!(whole_minutes(-1.0), 0);
        assert_eq!(whole_minutes(f64::NAN), 0);
        assert_eq!(whole_minutes(f64::INFINITY), 0);
    }

    #[test]
    fn random_speed_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert!(AVG_SPEED_RANGE_KMH.contains(&random_avg_speed(&mut rng)));
        }
    }
}
