use thiserror::Error;

use crate::{ProviderError, TransportMode};

/// Errors from [`crate::routing::RoutingProvider::route`] and
/// [`crate::routing::RouteResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The provider answered that no path connects the two points under the
    /// requested mode. Deterministic; never retried.
    #[error("no {mode} route connects the two points")]
    NoRouteFound {
        /// Profile the lookup used.
        mode: TransportMode,
    },
    /// The provider could not answer at all.
    #[error("routing provider unavailable: {source}")]
    ProviderUnavailable {
        /// Transport-level failure.
        #[from]
        source: ProviderError,
    },
}

impl RoutingError {
    /// The underlying provider failure, if this is not a domain answer.
    pub const fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::NoRouteFound { .. } => None,
            Self::ProviderUnavailable { source } => Some(source),
        }
    }
}
