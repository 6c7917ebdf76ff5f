use thiserror::Error;

use crate::ProviderError;

/// Reasons an elevation profile could not be produced.
///
/// None of these invalidate the reachability outcome they were computed
/// for; they only downgrade its elevation status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElevationError {
    /// The provider has no value for a route endpoint.
    #[error("no elevation available for point {point}")]
    ElevationUnavailable {
        /// Endpoint without a reading.
        point: u64,
    },
    /// The provider could not answer at all.
    #[error("elevation provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),
    /// The outcome has no route to sample.
    #[error("fire {fire} has no reachable water source")]
    Unreachable {
        /// Fire point of the outcome.
        fire: u64,
    },
}
