//! Core domain for deciding which water sources can supply a fire.
//!
//! A request is a handful of user-placed points, each either a fire or a
//! water source, plus a hose length and a [`TransportMode`]. The flow is:
//!
//! 1. [`PointSetValidator`] rejects oversized, out-of-range or degenerate
//!    input before any provider is contacted.
//! 2. [`ReachabilityEngine`] routes every (fire, source) pair through a
//!    [`RouteResolver`] and keeps the nearest source within hose length.
//! 3. [`ElevationAnnotator`] optionally samples terrain along the chosen
//!    route and reports the height the water must be lifted.
//!
//! [`Assessor`] ties the three together for a single [`ReachRequest`], and
//! [`Session`] supersedes in-flight requests while sharing a route cache.
//! External services sit behind the [`RoutingProvider`] and
//! [`ElevationProvider`] traits; HTTP implementations live in
//! `hoseline-data`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assess;
mod constraints;
mod elevation;
mod engine;
mod error;
mod geometry;
mod mode;
mod point;
mod retry;
mod route;
pub mod routing;
mod session;
mod validate;

#[doc(hidden)]
pub mod test_support;

pub use assess::{Assessment, AssessmentError, Assessor, ReachRequest};
pub use constraints::{
    Constraints, HoseLength, MAX_HOSE_LENGTH_M, MAX_PAIRWISE_DISTANCE_M, MAX_POINTS,
    MIN_HOSE_LENGTH_M,
};
pub use elevation::{
    DEFAULT_MAX_SAMPLES, Elevation, ElevationAnnotator, ElevationError, ElevationProfile,
    ElevationProvider, ElevationSample, Flow,
};
pub use engine::{
    DEFAULT_MAX_CONCURRENCY, EvaluationError, ReachabilityEngine, ReachabilityOutcome,
    SourceRoute, SourceSelection,
};
pub use error::ProviderError;
pub use geometry::great_circle_distance;
pub use mode::{TransportMode, UnknownTransportMode};
pub use point::{Point, PointKind};
pub use retry::RetryPolicy;
pub use route::{RouteRequest, RouteResult};
pub use routing::{RouteCache, RouteResolver, RoutingError, RoutingProvider};
pub use session::Session;
pub use validate::{PointSetValidator, ValidatedPointSet, ValidationError};
