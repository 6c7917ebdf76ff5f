//! Facade crate for the hoseline reachability engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP routing
//! and elevation adapters behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use hoseline_core::{
    Assessment, AssessmentError, Assessor, Constraints, Elevation, ElevationAnnotator,
    ElevationProfile, ElevationProvider, EvaluationError, Flow, HoseLength, Point, PointKind,
    PointSetValidator, ProviderError, ReachRequest, ReachabilityEngine, ReachabilityOutcome,
    RetryPolicy, RouteCache, RouteResolver, RouteResult, RoutingError, RoutingProvider, Session,
    SourceSelection, TransportMode, ValidatedPointSet, ValidationError,
};

#[cfg(feature = "http")]
pub use hoseline_data::{HttpElevationProvider, HttpProviderConfig, HttpRoutingProvider};
