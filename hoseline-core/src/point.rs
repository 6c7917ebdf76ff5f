//! User-placed map points: fire locations and water sources.

use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// The role a point plays in a reachability assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    /// A fire location that needs water.
    Fire,
    /// A hydrant, pond or other place water can be drawn from.
    #[serde(alias = "hydrant")]
    WaterSource,
}

impl PointKind {
    /// Return the lowercase identifier used in request payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::WaterSource => "water_source",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fire or water-source location.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Points are
/// immutable once created; validation of the coordinate range happens when a
/// whole set is checked by [`PointSetValidator`](crate::PointSetValidator).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hoseline_core::{Point, PointKind};
///
/// let hydrant = Point::water_source(7, Coord { x: 11.58, y: 48.15 });
/// assert_eq!(hydrant.kind(), PointKind::WaterSource);
/// assert_eq!(hydrant.latitude(), 48.15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRecord", into = "PointRecord")]
pub struct Point {
    id: u64,
    location: Coord<f64>,
    kind: PointKind,
}

impl Point {
    /// Construct a point of the given kind.
    pub const fn new(id: u64, location: Coord<f64>, kind: PointKind) -> Self {
        Self { id, location, kind }
    }

    /// Construct a fire point.
    pub const fn fire(id: u64, location: Coord<f64>) -> Self {
        Self::new(id, location, PointKind::Fire)
    }

    /// Construct a water-source point.
    pub const fn water_source(id: u64, location: Coord<f64>) -> Self {
        Self::new(id, location, PointKind::WaterSource)
    }

    /// Caller-assigned identifier, unique within a request.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Geospatial position.
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Whether this is a fire or a water source.
    pub const fn kind(&self) -> PointKind {
        self.kind
    }

    /// Shorthand for `kind() == PointKind::Fire`.
    pub fn is_fire(&self) -> bool {
        self.kind == PointKind::Fire
    }

    /// Shorthand for `kind() == PointKind::WaterSource`.
    pub fn is_water_source(&self) -> bool {
        self.kind == PointKind::WaterSource
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} ({}, {})",
            self.kind,
            self.id,
            self.latitude(),
            self.longitude()
        )
    }
}

/// Flat wire form of [`Point`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PointRecord {
    id: u64,
    latitude: f64,
    longitude: f64,
    kind: PointKind,
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Self::new(
            record.id,
            Coord {
                x: record.longitude,
                y: record.latitude,
            },
            record.kind,
        )
    }
}

impl From<Point> for PointRecord {
    fn from(point: Point) -> Self {
        Self {
            id: point.id,
            latitude: point.latitude(),
            longitude: point.longitude(),
            kind: point.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accessors_follow_lon_lat_convention() {
        let point = Point::fire(1, Coord { x: 11.5, y: 48.1 });
        assert_eq!(point.longitude(), 11.5);
        assert_eq!(point.latitude(), 48.1);
        assert!(point.is_fire());
        assert!(!point.is_water_source());
    }

    #[rstest]
    fn deserialises_flat_record() {
        let json = r#"{"id": 3, "latitude": 48.14, "longitude": 11.51, "kind": "fire"}"#;
        let point: Point = serde_json::from_str(json).expect("valid point");
        assert_eq!(point, Point::fire(3, Coord { x: 11.51, y: 48.14 }));
    }

    #[rstest]
    #[case("water_source")]
    #[case("hydrant")]
    fn accepts_hydrant_alias(#[case] label: &str) {
        let json = format!(r#"{{"id": 1, "latitude": 0.0, "longitude": 0.0, "kind": "{label}"}}"#);
        let point: Point = serde_json::from_str(&json).expect("valid point");
        assert_eq!(point.kind(), PointKind::WaterSource);
    }

    #[rstest]
    fn serialises_with_canonical_kind() {
        let point = Point::water_source(2, Coord { x: 1.0, y: 2.0 });
        let value = serde_json::to_value(point).expect("serialise point");
        assert_eq!(value["kind"], "water_source");
        assert_eq!(value["latitude"], 2.0);
    }
}
