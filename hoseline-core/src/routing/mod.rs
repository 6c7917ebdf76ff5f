//! Resolve paths between fire points and water sources.
//!
//! The [`RoutingProvider`] trait abstracts the external routing service.
//! [`RouteResolver`] wraps a provider with bounded retries and an optional
//! shared [`RouteCache`], and is the only component the reachability engine
//! talks to.
//!
//! A provider must report "no connecting path" as
//! [`RoutingError::NoRouteFound`], never as a straight-line fallback, so that
//! the pair is marked unreachable rather than falsely reachable.

mod cache;
mod error;
mod provider;
mod resolver;

pub use cache::{CachedRoute, RouteCache, RouteKey};
pub use error::RoutingError;
pub use provider::RoutingProvider;
pub use resolver::RouteResolver;
