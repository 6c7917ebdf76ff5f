//! Hose-length reachability between fire points and water sources.
//!
//! The engine fans out one route lookup per (fire, source) pair, bounded by
//! `max_concurrency`, and folds the answers back into one
//! [`ReachabilityOutcome`] per fire once every lookup has completed.

use std::pin::pin;

use futures_util::stream::{self, StreamExt};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    Elevation, HoseLength, Point, ProviderError, RouteCache, RouteRequest, RouteResolver,
    RouteResult, RoutingError, TransportMode, ValidatedPointSet,
};

/// Default number of route lookups in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Which reachable sources an outcome lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSelection {
    /// Keep only the nearest reachable source.
    #[default]
    Nearest,
    /// Also list every other reachable source, nearest first.
    AllReachable,
}

/// A water source together with the route to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRoute {
    /// The water source.
    pub source: Point,
    /// Route from the fire to the source.
    pub route: RouteResult,
}

/// Reachability of one fire point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachabilityOutcome {
    /// The fire point this outcome describes.
    pub fire: Point,
    /// Nearest reachable source, if any.
    pub best_source: Option<Point>,
    /// Route from the fire to `best_source`.
    pub route: Option<RouteResult>,
    /// Whether any source is within hose length.
    pub reachable: bool,
    /// Other reachable sources, ordered by distance. Empty under
    /// [`SourceSelection::Nearest`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<SourceRoute>,
    /// Sources the provider reported no path to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unroutable: Vec<u64>,
    /// Elevation along `route`.
    pub elevation: Elevation,
}

impl ReachabilityOutcome {
    /// Route distance to the best source in metres.
    pub fn distance_m(&self) -> Option<f64> {
        self.route.as_ref().map(|route| route.distance_m)
    }
}

/// Batch-level failures; per-pair "no route" answers never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The routing provider failed for a pair even after retries.
    #[error("routing provider unavailable for fire {fire} and water source {water_source}: {error}")]
    ProviderUnavailable {
        /// Identifier of the fire point of the failed pair.
        fire: u64,
        /// Identifier of the water source of the failed pair.
        water_source: u64,
        /// Last provider failure after retries.
        #[source]
        error: ProviderError,
    },
    /// The caller cancelled the evaluation.
    #[error("evaluation cancelled")]
    Cancelled,
}

enum PairAnswer {
    Route(RouteResult),
    NoRoute,
}

/// Decides, per fire, which water sources a hose can reach.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use geo::Coord;
/// use hoseline_core::test_support::StubRoutingProvider;
/// use hoseline_core::{
///     Point, PointSetValidator, ReachabilityEngine, RouteResolver, TransportMode,
/// };
///
/// let fire = Point::fire(1, Coord { x: 11.510, y: 48.140 });
/// let hydrant = Point::water_source(2, Coord { x: 11.512, y: 48.141 });
/// let provider = StubRoutingProvider::new().with_route(&fire, &hydrant, 300.0);
/// let engine = ReachabilityEngine::new(RouteResolver::new(Arc::new(provider)));
/// let set = PointSetValidator::default().validate(vec![fire, hydrant], 500.0)?;
///
/// let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
/// let outcomes = runtime.block_on(engine.evaluate(&set, TransportMode::Driving, set.hose_length()))?;
/// assert!(outcomes[0].reachable);
/// assert_eq!(outcomes[0].best_source.map(|s| s.id()), Some(2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReachabilityEngine {
    resolver: RouteResolver,
    selection: SourceSelection,
    max_concurrency: usize,
}

impl ReachabilityEngine {
    /// Evaluate through `resolver` with default policy and concurrency.
    pub const fn new(resolver: RouteResolver) -> Self {
        Self {
            resolver,
            selection: SourceSelection::Nearest,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Choose which reachable sources are reported.
    #[must_use]
    pub const fn with_selection(mut self, selection: SourceSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Bound the number of concurrent lookups. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// The resolver used for lookups.
    pub const fn resolver(&self) -> &RouteResolver {
        &self.resolver
    }

    /// Current source selection policy.
    pub const fn selection(&self) -> SourceSelection {
        self.selection
    }

    /// Upper bound on concurrent lookups.
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Route lookups through `cache` from now on.
    #[must_use]
    pub fn with_route_cache(mut self, cache: RouteCache) -> Self {
        self.resolver = self.resolver.with_cache(cache);
        self
    }

    /// Evaluate every fire in `set`, in input order.
    pub async fn evaluate(
        &self,
        set: &ValidatedPointSet,
        mode: TransportMode,
        hose_length: HoseLength,
    ) -> Result<Vec<ReachabilityOutcome>, EvaluationError> {
        self.evaluate_cancellable(set, mode, hose_length, &CancellationToken::new())
            .await
    }

    /// Like [`Self::evaluate`], but abandons all outstanding lookups and
    /// returns [`EvaluationError::Cancelled`] once `token` is cancelled.
    pub async fn evaluate_cancellable(
        &self,
        set: &ValidatedPointSet,
        mode: TransportMode,
        hose_length: HoseLength,
        token: &CancellationToken,
    ) -> Result<Vec<ReachabilityOutcome>, EvaluationError> {
        if token.is_cancelled() {
            return Err(EvaluationError::Cancelled);
        }
        let fires: Vec<&Point> = set.fires().collect();
        let sources: Vec<&Point> = set.sources().collect();

        let resolver = &self.resolver;
        let pairs = fires.iter().enumerate().flat_map(|(fire_idx, &fire)| {
            sources
                .iter()
                .enumerate()
                .map(move |(source_idx, &source)| {
                    let request = RouteRequest {
                        origin: *fire,
                        destination: *source,
                        mode,
                    };
                    (fire_idx, source_idx, request)
                })
        });
        let mut lookups = pin!(
            stream::iter(pairs)
                .map(move |(fire_idx, source_idx, request)| async move {
                    let answer = resolver.resolve_request(&request).await;
                    (fire_idx, source_idx, answer)
                })
                .buffer_unordered(self.max_concurrency)
        );

        let mut answers: Vec<Vec<Option<PairAnswer>>> = fires
            .iter()
            .map(|_| sources.iter().map(|_| None).collect())
            .collect();
        loop {
            let next = tokio::select! {
                biased;
                () = token.cancelled() => return Err(EvaluationError::Cancelled),
                next = lookups.next() => next,
            };
            let Some((fire_idx, source_idx, answer)) = next else {
                break;
            };
            let answer = match answer {
                Ok(route) => PairAnswer::Route(route),
                Err(RoutingError::NoRouteFound { .. }) => PairAnswer::NoRoute,
                Err(RoutingError::ProviderUnavailable { source }) => {
                    return Err(EvaluationError::ProviderUnavailable {
                        fire: fires.get(fire_idx).map_or(0, |p| p.id()),
                        water_source: sources.get(source_idx).map_or(0, |p| p.id()),
                        error: source,
                    });
                }
            };
            if let Some(slot) = answers
                .get_mut(fire_idx)
                .and_then(|row| row.get_mut(source_idx))
            {
                *slot = Some(answer);
            }
        }

        let outcomes: Vec<ReachabilityOutcome> = fires
            .iter()
            .zip(answers)
            .map(|(fire, row)| self.aggregate(fire, &sources, row, hose_length))
            .collect();
        info!(
            "evaluated {} pairs by {mode} with a {hose_length} hose: {} of {} fires reachable",
            set.pair_count(),
            outcomes.iter().filter(|o| o.reachable).count(),
            outcomes.len()
        );
        Ok(outcomes)
    }

    fn aggregate(
        &self,
        fire: &Point,
        sources: &[&Point],
        answers: Vec<Option<PairAnswer>>,
        hose_length: HoseLength,
    ) -> ReachabilityOutcome {
        let mut reachable = Vec::new();
        let mut unroutable = Vec::new();
        for (&source, answer) in sources.iter().zip(answers) {
            match answer {
                Some(PairAnswer::Route(route)) => {
                    if hose_length.spans(route.distance_m) {
                        reachable.push(SourceRoute {
                            source: *source,
                            route,
                        });
                    }
                }
                // The stream is drained before aggregation, so every pair
                // has an answer.
                Some(PairAnswer::NoRoute) | None => unroutable.push(source.id()),
            }
        }

        // Stable: equal distances keep input order.
        reachable.sort_by(|a, b| a.route.distance_m.total_cmp(&b.route.distance_m));
        let mut ranked = reachable.into_iter();
        let best = ranked.next();
        let alternatives = match self.selection {
            SourceSelection::Nearest => Vec::new(),
            SourceSelection::AllReachable => ranked.collect(),
        };

        ReachabilityOutcome {
            fire: *fire,
            reachable: best.is_some(),
            best_source: best.as_ref().map(|b| b.source),
            route: best.map(|b| b.route),
            alternatives,
            unroutable,
            elevation: Elevation::NotRequested,
        }
    }
}
