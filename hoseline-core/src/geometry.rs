//! Great-circle helpers shared by validation and elevation sampling.

use geo::{Coord, Distance, Haversine, Point as GeoPoint};

/// Haversine distance in metres between two WGS84 coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hoseline_core::great_circle_distance;
///
/// let munich = Coord { x: 11.582, y: 48.135 };
/// assert_eq!(great_circle_distance(munich, munich), 0.0);
/// ```
pub fn great_circle_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(GeoPoint::from(a), GeoPoint::from(b))
}

/// Running haversine distance from the first vertex to every vertex.
///
/// The result has the same length as `coords`; the first entry is `0.0`.
pub(crate) fn cumulative_distances(coords: &[Coord<f64>]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(coords.len());
    let mut previous: Option<Coord<f64>> = None;
    for &coord in coords {
        if let Some(prev) = previous {
            total += great_circle_distance(prev, coord);
        }
        out.push(total);
        previous = Some(coord);
    }
    out
}

/// Whether a coordinate lies inside the WGS84 domain.
pub(crate) fn is_valid_coordinate(coord: Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}
