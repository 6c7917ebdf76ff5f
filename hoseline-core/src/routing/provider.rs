//! Routing provider trait.

use async_trait::async_trait;
use geo::Coord;

use crate::{RouteResult, TransportMode};

use super::error::RoutingError;

/// Fetch a path between two coordinates under a transport mode.
///
/// Implementations issue exactly one outbound request per call; retrying and
/// caching are the resolver's job.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geo::Coord;
/// use hoseline_core::{RouteResult, RoutingError, RoutingProvider, TransportMode};
///
/// struct Straight;
///
/// #[async_trait]
/// impl RoutingProvider for Straight {
///     async fn route(
///         &self,
///         origin: Coord<f64>,
///         destination: Coord<f64>,
///         _mode: TransportMode,
///     ) -> Result<RouteResult, RoutingError> {
///         Ok(RouteResult::straight(100.0, origin, destination))
///     }
/// }
/// ```
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Return the route from `origin` to `destination`.
    ///
    /// Implementations must return [`RoutingError::NoRouteFound`] when the
    /// provider positively reports that no path exists, and
    /// [`RoutingError::ProviderUnavailable`] for transport failures.
    async fn route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<RouteResult, RoutingError>;
}
