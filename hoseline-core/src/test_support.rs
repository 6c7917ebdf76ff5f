//! Test utilities for routing and elevation providers.
//!
//! [`StubRoutingProvider`] and [`StubElevationProvider`] are deterministic
//! test doubles that answer from pre-configured tables without making any
//! network requests, and count how often they were asked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;

use crate::{
    ElevationProvider, Point, ProviderError, RouteResult, RoutingError, RoutingProvider,
    TransportMode,
};

type CoordBits = (u64, u64);

fn bits(coord: Coord<f64>) -> CoordBits {
    (coord.x.to_bits(), coord.y.to_bits())
}

/// Stub `RoutingProvider` for testing.
///
/// Pairs without a configured distance are answered with
/// [`RoutingError::NoRouteFound`]. Pairs are matched in either direction.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use hoseline_core::test_support::StubRoutingProvider;
/// use hoseline_core::Point;
///
/// let fire = Point::fire(1, Coord { x: 0.0, y: 0.0 });
/// let hydrant = Point::water_source(2, Coord { x: 0.001, y: 0.0 });
/// let provider = StubRoutingProvider::new().with_route(&fire, &hydrant, 111.0);
/// assert_eq!(provider.calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct StubRoutingProvider {
    routes: HashMap<(CoordBits, CoordBits), f64>,
    no_route_modes: Vec<TransportMode>,
    delays: HashMap<(CoordBits, CoordBits), Duration>,
    failure: Option<ProviderError>,
    pair_failures: HashMap<(CoordBits, CoordBits), ProviderError>,
    transient_failures: AtomicU32,
    calls: AtomicUsize,
}

impl StubRoutingProvider {
    /// Create a provider that knows no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `origin` ↔ `destination` with a straight route of `distance_m`.
    #[must_use]
    pub fn with_route(mut self, origin: &Point, destination: &Point, distance_m: f64) -> Self {
        self.routes
            .insert((bits(origin.location()), bits(destination.location())), distance_m);
        self
    }

    /// Answer every request under `mode` with "no route".
    #[must_use]
    pub fn without_routes_for(mut self, mode: TransportMode) -> Self {
        self.no_route_modes.push(mode);
        self
    }

    /// Delay answers for `origin` ↔ `destination`.
    #[must_use]
    pub fn with_delay(mut self, origin: &Point, destination: &Point, delay: Duration) -> Self {
        self.delays
            .insert((bits(origin.location()), bits(destination.location())), delay);
        self
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_failure(mut self, error: ProviderError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Fail requests for `origin` ↔ `destination` with `error`.
    #[must_use]
    pub fn with_failure_for(
        mut self,
        origin: &Point,
        destination: &Point,
        error: ProviderError,
    ) -> Self {
        self.pair_failures
            .insert((bits(origin.location()), bits(destination.location())), error);
        self
    }

    /// Fail the first `count` requests with a transient network error.
    #[must_use]
    pub fn with_transient_failures(self, count: u32) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Number of `route` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup<T: Clone>(
        table: &HashMap<(CoordBits, CoordBits), T>,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Option<T> {
        let (a, b) = (bits(origin), bits(destination));
        table.get(&(a, b)).or_else(|| table.get(&(b, a))).cloned()
    }
}

#[async_trait]
impl RoutingProvider for StubRoutingProvider {
    async fn route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<RouteResult, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = Self::lookup(&self.delays, origin, destination) {
            tokio::time::sleep(delay).await;
        }
        if self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ProviderError::Network {
                url: "stub://routing".to_owned(),
                message: "connection reset".to_owned(),
            }
            .into());
        }
        if let Some(error) = &self.failure {
            return Err(error.clone().into());
        }
        if let Some(error) = Self::lookup(&self.pair_failures, origin, destination) {
            return Err(error.into());
        }
        if self.no_route_modes.contains(&mode) {
            return Err(RoutingError::NoRouteFound { mode });
        }
        Self::lookup(&self.routes, origin, destination)
            .map(|distance| RouteResult::straight(distance, origin, destination))
            .ok_or(RoutingError::NoRouteFound { mode })
    }
}

/// Stub `ElevationProvider` for testing.
///
/// Coordinates without a configured elevation receive the default, which is
/// `None` unless set with [`Self::with_default`].
#[derive(Debug, Default)]
pub struct StubElevationProvider {
    elevations: HashMap<CoordBits, f64>,
    default: Option<f64>,
    failure: Option<ProviderError>,
    calls: AtomicUsize,
}

impl StubElevationProvider {
    /// Create a provider with no data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `elevation_m` at `point`.
    #[must_use]
    pub fn with_point(self, point: &Point, elevation_m: f64) -> Self {
        self.with_elevation(point.location(), elevation_m)
    }

    /// Report `elevation_m` at `location`.
    #[must_use]
    pub fn with_elevation(mut self, location: Coord<f64>, elevation_m: f64) -> Self {
        self.elevations.insert(bits(location), elevation_m);
        self
    }

    /// Value for unknown coordinates.
    #[must_use]
    pub const fn with_default(mut self, elevation_m: Option<f64>) -> Self {
        self.default = elevation_m;
        self
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_failure(mut self, error: ProviderError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of `elevations` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ElevationProvider for StubElevationProvider {
    async fn elevations(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<Vec<Option<f64>>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(locations
            .iter()
            .map(|&location| {
                self.elevations
                    .get(&bits(location))
                    .copied()
                    .or(self.default)
            })
            .collect())
    }
}
