//! Sample elevation along the best route of a reachability outcome.

use std::fmt;
use std::sync::Arc;

use geo::Coord;
use log::debug;

use crate::geometry::cumulative_distances;
use crate::{ProviderError, ReachabilityOutcome, RetryPolicy};

use super::error::ElevationError;
use super::profile::{ElevationProfile, ElevationSample};
use super::provider::ElevationProvider;

/// Default upper bound on elevation lookups per route.
pub const DEFAULT_MAX_SAMPLES: usize = 16;

/// Computes [`ElevationProfile`]s for reachable outcomes.
///
/// Each annotation is a single batched provider call covering the water
/// source, the fire, and up to `max_samples - 2` evenly spaced interior
/// vertices of the route between them.
#[derive(Clone)]
pub struct ElevationAnnotator {
    provider: Arc<dyn ElevationProvider>,
    retry: RetryPolicy,
    max_samples: usize,
}

impl fmt::Debug for ElevationAnnotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevationAnnotator")
            .field("provider", &"<dyn ElevationProvider>")
            .field("retry", &self.retry)
            .field("max_samples", &self.max_samples)
            .finish()
    }
}

impl ElevationAnnotator {
    /// Wrap `provider` with the default retry policy and sample budget.
    pub fn new(provider: Arc<dyn ElevationProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Cap the number of sampled vertices. Values below two are raised to two
    /// so both endpoints are always sampled.
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples.max(2);
        self
    }

    /// Current sample budget.
    pub const fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Build the elevation profile for `outcome`'s best route.
    ///
    /// # Errors
    ///
    /// - [`ElevationError::Unreachable`] when the outcome has no route.
    /// - [`ElevationError::ElevationUnavailable`] when the provider has no
    ///   value for the source or the fire.
    /// - [`ElevationError::ProviderUnavailable`] when the provider still fails
    ///   after retries.
    pub async fn annotate(
        &self,
        outcome: &ReachabilityOutcome,
    ) -> Result<ElevationProfile, ElevationError> {
        let fire = outcome.fire;
        let (Some(source), Some(route), true) =
            (outcome.best_source, outcome.route.as_ref(), outcome.reachable)
        else {
            return Err(ElevationError::Unreachable { fire: fire.id() });
        };

        // Routes are resolved fire -> source; water runs the other way. The
        // provider's geometry is snapped to the network, so the endpoints are
        // the user-placed points and only interior vertices come from it.
        let path = route.reversed().geometry.0;
        let along = cumulative_distances(&path);
        let interior = path.len().saturating_sub(1);
        let mut candidates = vec![(source.location(), 0.0)];
        candidates.extend(
            path.iter()
                .zip(&along)
                .take(interior)
                .skip(1)
                .map(|(&coord, &distance_m)| (coord, distance_m.min(route.distance_m))),
        );
        candidates.push((fire.location(), route.distance_m));

        let picks = sample_indices(candidates.len(), self.max_samples);
        let (locations, offsets): (Vec<Coord<f64>>, Vec<f64>) = picks
            .iter()
            .filter_map(|&i| candidates.get(i).copied())
            .unzip();

        let label = format!("elevation {} -> {}", source.id(), fire.id());
        let provider = &self.provider;
        let batch = locations.as_slice();
        let readings = self
            .retry
            .run(&label, |err| Some(err), move || provider.elevations(batch))
            .await?;
        if readings.len() != locations.len() {
            return Err(ProviderError::Parse {
                message: format!(
                    "expected {} elevations, got {}",
                    locations.len(),
                    readings.len()
                ),
            }
            .into());
        }

        if readings.first().copied().flatten().is_none() {
            return Err(ElevationError::ElevationUnavailable { point: source.id() });
        }
        if readings.last().copied().flatten().is_none() {
            return Err(ElevationError::ElevationUnavailable { point: fire.id() });
        }

        let samples: Vec<ElevationSample> = offsets
            .iter()
            .zip(&readings)
            .filter_map(|(&distance_m, reading)| {
                reading.map(|elevation_m| ElevationSample {
                    distance_m,
                    elevation_m,
                })
            })
            .collect();
        debug!(
            "{label}: {} of {} samples available",
            samples.len(),
            readings.len()
        );
        ElevationProfile::from_samples(samples).ok_or(ElevationError::Unreachable { fire: fire.id() })
    }
}

/// Indices of at most `budget` vertices out of `len`, always including the
/// first and last, spread evenly in between.
fn sample_indices(len: usize, budget: usize) -> Vec<usize> {
    if len <= budget {
        return (0..len).collect();
    }
    let last = len - 1;
    let steps = budget.max(2) - 1;
    let mut picks: Vec<usize> = (0..=steps)
        .map(|i| (i * last + steps / 2) / steps)
        .collect();
    picks.dedup();
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubElevationProvider;
    use crate::{Elevation, Point, RouteResult};
    use geo::LineString;
    use rstest::{fixture, rstest};

    fn fire() -> Point {
        Point::fire(1, Coord { x: 11.514, y: 48.142 })
    }

    fn hydrant() -> Point {
        Point::water_source(2, Coord { x: 11.510, y: 48.140 })
    }

    #[fixture]
    fn outcome() -> ReachabilityOutcome {
        let mid = Coord { x: 11.512, y: 48.141 };
        let route = RouteResult::new(
            300.0,
            LineString::from(vec![fire().location(), mid, hydrant().location()]),
        );
        ReachabilityOutcome {
            fire: fire(),
            best_source: Some(hydrant()),
            route: Some(route),
            reachable: true,
            alternatives: Vec::new(),
            unroutable: Vec::new(),
            elevation: Elevation::NotRequested,
        }
    }

    #[rstest]
    fn sample_indices_keep_endpoints() {
        assert_eq!(sample_indices(3, 16), vec![0, 1, 2]);
        let picks = sample_indices(100, 5);
        assert_eq!(picks.len(), 5);
        assert_eq!(picks.first(), Some(&0));
        assert_eq!(picks.last(), Some(&99));
    }

    #[rstest]
    #[tokio::test]
    async fn delta_is_fire_minus_source(outcome: ReachabilityOutcome) {
        let stub = StubElevationProvider::new()
            .with_point(&fire(), 400.0)
            .with_point(&hydrant(), 350.0)
            .with_default(Some(360.0));
        let annotator = ElevationAnnotator::new(Arc::new(stub));

        let profile = annotator.annotate(&outcome).await.expect("profile");

        assert_eq!(profile.delta_m, 50.0);
        assert_eq!(profile.source_elevation(), Some(350.0));
        assert_eq!(profile.fire_elevation(), Some(400.0));
        assert_eq!(profile.samples.len(), 3);
        assert_eq!(profile.samples.first().map(|s| s.distance_m), Some(0.0));
    }

    #[rstest]
    #[tokio::test]
    async fn endpoints_are_sampled_at_the_placed_points() {
        // The network snaps both ends roughly ten metres away from the points.
        let snapped_fire = Coord { x: 11.514_1, y: 48.142_05 };
        let snapped_hydrant = Coord { x: 11.509_9, y: 48.139_95 };
        let route = RouteResult::new(
            300.0,
            LineString::from(vec![
                snapped_fire,
                Coord { x: 11.512, y: 48.141 },
                snapped_hydrant,
            ]),
        );
        let outcome = ReachabilityOutcome {
            route: Some(route),
            ..outcome()
        };
        let stub = Arc::new(
            StubElevationProvider::new()
                .with_point(&fire(), 400.0)
                .with_point(&hydrant(), 350.0)
                .with_default(Some(380.0)),
        );
        let annotator = ElevationAnnotator::new(stub.clone());

        let profile = annotator.annotate(&outcome).await.expect("profile");

        assert_eq!(profile.delta_m, 50.0);
        assert_eq!(profile.source_elevation(), Some(350.0));
        assert_eq!(profile.fire_elevation(), Some(400.0));
        assert_eq!(profile.samples.len(), 3);
        assert_eq!(profile.samples.last().map(|s| s.distance_m), Some(300.0));
        assert_eq!(stub.calls(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_intermediate_samples_are_dropped(outcome: ReachabilityOutcome) {
        let stub = StubElevationProvider::new()
            .with_point(&fire(), 400.0)
            .with_point(&hydrant(), 350.0);
        let annotator = ElevationAnnotator::new(Arc::new(stub));

        let profile = annotator.annotate(&outcome).await.expect("profile");

        assert_eq!(profile.samples.len(), 2);
        assert_eq!(profile.delta_m, 50.0);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_endpoint_is_unavailable(outcome: ReachabilityOutcome) {
        let stub = StubElevationProvider::new().with_point(&hydrant(), 350.0);
        let annotator = ElevationAnnotator::new(Arc::new(stub));

        let err = annotator.annotate(&outcome).await.expect_err("no fire elevation");

        assert_eq!(err, ElevationError::ElevationUnavailable { point: 1 });
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_outcome_is_rejected(mut outcome: ReachabilityOutcome) {
        outcome.reachable = false;
        outcome.best_source = None;
        outcome.route = None;
        let stub = Arc::new(StubElevationProvider::new());
        let annotator = ElevationAnnotator::new(stub.clone());

        let err = annotator.annotate(&outcome).await.expect_err("unreachable");

        assert_eq!(err, ElevationError::Unreachable { fire: 1 });
        assert_eq!(stub.calls(), 0);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn provider_outage_is_reported_after_retries(outcome: ReachabilityOutcome) {
        let stub = Arc::new(StubElevationProvider::new().with_failure(ProviderError::Http {
            url: "http://elevation".to_owned(),
            status: 503,
            message: "busy".to_owned(),
        }));
        let annotator = ElevationAnnotator::new(stub.clone());

        let err = annotator.annotate(&outcome).await.expect_err("outage");

        assert!(matches!(err, ElevationError::ProviderUnavailable(_)));
        assert_eq!(stub.calls(), 3);
    }
}
