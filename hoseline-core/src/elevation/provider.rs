//! Elevation provider trait.

use async_trait::async_trait;
use geo::Coord;

use crate::ProviderError;

/// Look up terrain elevation for a batch of coordinates.
///
/// The answer has one entry per input coordinate, in input order. `None`
/// marks a coordinate the provider has no data for.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geo::Coord;
/// use hoseline_core::{ElevationProvider, ProviderError};
///
/// struct SeaLevel;
///
/// #[async_trait]
/// impl ElevationProvider for SeaLevel {
///     async fn elevations(
///         &self,
///         locations: &[Coord<f64>],
///     ) -> Result<Vec<Option<f64>>, ProviderError> {
///         Ok(vec![Some(0.0); locations.len()])
///     }
/// }
/// ```
#[async_trait]
pub trait ElevationProvider: Send + Sync {
    /// Elevation in metres above sea level for each of `locations`.
    async fn elevations(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<Vec<Option<f64>>, ProviderError>;
}
