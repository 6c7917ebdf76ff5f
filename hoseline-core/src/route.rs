//! Resolved paths between a fire point and a water source.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::{Point, TransportMode};

/// One routing question: how far is `destination` from `origin` by `mode`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Where the path starts.
    pub origin: Point,
    /// Where the path ends.
    pub destination: Point,
    /// Profile to route with.
    pub mode: TransportMode,
}

/// A path returned by a routing provider.
///
/// # Examples
/// ```
/// use geo::{Coord, LineString};
/// use hoseline_core::RouteResult;
///
/// let route = RouteResult::new(
///     300.0,
///     LineString::from(vec![Coord { x: 11.51, y: 48.14 }, Coord { x: 11.512, y: 48.141 }]),
/// );
/// assert_eq!(route.distance_m, 300.0);
/// assert_eq!(route.start(), Some(Coord { x: 11.51, y: 48.14 }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Traversal distance along the path, in metres.
    pub distance_m: f64,
    /// Ordered vertices from origin to destination.
    pub geometry: LineString<f64>,
}

impl RouteResult {
    /// Bundle a distance with its path.
    pub const fn new(distance_m: f64, geometry: LineString<f64>) -> Self {
        Self {
            distance_m,
            geometry,
        }
    }

    /// A two-vertex route between the given endpoints.
    ///
    /// Useful for providers that report only a distance.
    pub fn straight(distance_m: f64, origin: Coord<f64>, destination: Coord<f64>) -> Self {
        Self::new(distance_m, LineString::from(vec![origin, destination]))
    }

    /// First vertex of the path.
    pub fn start(&self) -> Option<Coord<f64>> {
        self.geometry.0.first().copied()
    }

    /// Last vertex of the path.
    pub fn end(&self) -> Option<Coord<f64>> {
        self.geometry.0.last().copied()
    }

    /// The same path walked backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut coords = self.geometry.0.clone();
        coords.reverse();
        Self::new(self.distance_m, LineString::from(coords))
    }
}
