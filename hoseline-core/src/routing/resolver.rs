//! Retrying, caching front for a [`RoutingProvider`].

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::{Point, RetryPolicy, RouteRequest, RouteResult, TransportMode};

use super::cache::{RouteCache, RouteKey};
use super::error::RoutingError;
use super::provider::RoutingProvider;

/// Obtains routes for point pairs.
///
/// The provider is injected so tests can substitute a fake; the cache is
/// optional and may be shared between resolvers of one session.
#[derive(Clone)]
pub struct RouteResolver {
    provider: Arc<dyn RoutingProvider>,
    retry: RetryPolicy,
    cache: Option<RouteCache>,
}

impl fmt::Debug for RouteResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteResolver")
            .field("provider", &"<dyn RoutingProvider>")
            .field("retry", &self.retry)
            .field("cache", &self.cache)
            .finish()
    }
}

impl RouteResolver {
    /// Wrap `provider` with the default retry policy and no cache.
    pub fn new(provider: Arc<dyn RoutingProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            cache: None,
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a (possibly shared) cache.
    #[must_use]
    pub fn with_cache(mut self, cache: RouteCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The attached cache, if any.
    pub const fn cache(&self) -> Option<&RouteCache> {
        self.cache.as_ref()
    }

    /// Route from `origin` to `destination` under `mode`.
    ///
    /// Answers come from the cache when present; otherwise one provider call
    /// is made, retried only on transient failures. Both routes and
    /// [`RoutingError::NoRouteFound`] answers are cached.
    pub async fn resolve(
        &self,
        origin: &Point,
        destination: &Point,
        mode: TransportMode,
    ) -> Result<RouteResult, RoutingError> {
        let key = RouteKey::new(origin.location(), destination.location(), mode);
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!(
                "route cache hit for {} -> {} ({mode})",
                origin.id(),
                destination.id()
            );
            return cached.ok_or(RoutingError::NoRouteFound { mode });
        }

        let label = format!("route {} -> {} ({mode})", origin.id(), destination.id());
        let (from, to) = (origin.location(), destination.location());
        let provider = &self.provider;
        let result = self
            .retry
            .run(&label, RoutingError::provider_error, move || {
                provider.route(from, to, mode)
            })
            .await;

        match &result {
            Ok(route) => {
                debug!("{label}: {:.0} m", route.distance_m);
                self.remember(key, Some(route.clone()));
            }
            Err(RoutingError::NoRouteFound { .. }) => {
                debug!("{label}: no route");
                self.remember(key, None);
            }
            Err(RoutingError::ProviderUnavailable { .. }) => {}
        }
        result
    }

    /// Resolve a prepared [`RouteRequest`].
    pub async fn resolve_request(
        &self,
        request: &RouteRequest,
    ) -> Result<RouteResult, RoutingError> {
        self.resolve(&request.origin, &request.destination, request.mode)
            .await
    }

    fn remember(&self, key: RouteKey, value: Option<RouteResult>) {
        if let Some(cache) = &self.cache {
            cache.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderError;
    use crate::test_support::StubRoutingProvider;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fire() -> Point {
        Point::fire(1, Coord { x: 11.510, y: 48.140 })
    }

    #[fixture]
    fn hydrant() -> Point {
        Point::water_source(2, Coord { x: 11.512, y: 48.141 })
    }

    #[rstest]
    #[tokio::test]
    async fn returns_provider_route(fire: Point, hydrant: Point) {
        let stub = Arc::new(StubRoutingProvider::new().with_route(&fire, &hydrant, 300.0));
        let resolver = RouteResolver::new(stub.clone());

        let route = resolver
            .resolve(&fire, &hydrant, TransportMode::Driving)
            .await
            .expect("route");

        assert_eq!(route.distance_m, 300.0);
        assert_eq!(stub.calls(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn no_route_is_not_replaced_by_straight_line(fire: Point, hydrant: Point) {
        let stub = Arc::new(StubRoutingProvider::new());
        let resolver = RouteResolver::new(stub);

        let err = resolver
            .resolve(&fire, &hydrant, TransportMode::ServiceDriving)
            .await
            .expect_err("no route");

        assert_eq!(
            err,
            RoutingError::NoRouteFound {
                mode: TransportMode::ServiceDriving
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn cache_hits_skip_the_provider(fire: Point, hydrant: Point) {
        let stub = Arc::new(StubRoutingProvider::new().with_route(&fire, &hydrant, 300.0));
        let resolver = RouteResolver::new(stub.clone()).with_cache(RouteCache::new());

        let first = resolver
            .resolve(&fire, &hydrant, TransportMode::Driving)
            .await
            .expect("first");
        let second = resolver
            .resolve(&fire, &hydrant, TransportMode::Driving)
            .await
            .expect("second");

        assert_eq!(first, second);
        assert_eq!(stub.calls(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn negative_answers_are_cached(fire: Point, hydrant: Point) {
        let stub = Arc::new(StubRoutingProvider::new());
        let resolver = RouteResolver::new(stub.clone()).with_cache(RouteCache::new());

        for _ in 0..2 {
            let result = resolver
                .resolve(&fire, &hydrant, TransportMode::Walking)
                .await;
            assert!(matches!(result, Err(RoutingError::NoRouteFound { .. })));
        }
        assert_eq!(stub.calls(), 1);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried(fire: Point, hydrant: Point) {
        let stub = Arc::new(
            StubRoutingProvider::new()
                .with_route(&fire, &hydrant, 250.0)
                .with_transient_failures(2),
        );
        let resolver = RouteResolver::new(stub.clone());

        let route = resolver
            .resolve(&fire, &hydrant, TransportMode::Walking)
            .await
            .expect("eventual success");

        assert_eq!(route.distance_m, 250.0);
        assert_eq!(stub.calls(), 3);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn persistent_outage_surfaces_provider_unavailable(fire: Point, hydrant: Point) {
        let stub = Arc::new(StubRoutingProvider::new().with_failure(ProviderError::Timeout {
            url: "http://osrm".to_owned(),
            timeout_secs: 30,
        }));
        let resolver = RouteResolver::new(stub.clone())
            .with_retry(RetryPolicy::default().with_max_attempts(3))
            .with_cache(RouteCache::new());

        let err = resolver
            .resolve(&fire, &hydrant, TransportMode::Driving)
            .await
            .expect_err("outage");

        assert!(matches!(err, RoutingError::ProviderUnavailable { .. }));
        assert_eq!(stub.calls(), 3);
        assert!(resolver.cache().is_some_and(RouteCache::is_empty));
    }
}
