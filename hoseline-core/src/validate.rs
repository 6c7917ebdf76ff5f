//! Structural and geometric checks run before any provider is contacted.
//!
//! Validation is a pure classification step: it either hands back the
//! original points wrapped in a [`ValidatedPointSet`] or names the first
//! constraint they break. Checks run cheapest first so that an oversized
//! request never pays for the pairwise distance scan.

use std::collections::HashSet;

use thiserror::Error;

use crate::geometry::{great_circle_distance, is_valid_coordinate};
use crate::{Constraints, HoseLength, Point};

/// Reasons a point set is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// More points than the configured maximum.
    #[error("{count} points supplied but at most {max} are allowed")]
    TooManyPoints {
        /// Points supplied.
        count: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Hose length outside the configured range.
    #[error("hose length {value} m is out of the range [{min}, {max}]")]
    HoseLengthOutOfRange {
        /// Requested length in metres.
        value: f64,
        /// Shortest accepted length in metres.
        min: f64,
        /// Longest accepted length in metres.
        max: f64,
    },
    /// A coordinate is not a finite WGS84 position.
    #[error("point {id} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Offending point.
        id: u64,
        /// Latitude as supplied.
        latitude: f64,
        /// Longitude as supplied.
        longitude: f64,
    },
    /// Two points share an identifier.
    #[error("point id {id} is used more than once")]
    DuplicatePointId {
        /// The repeated identifier.
        id: u64,
    },
    /// Two points are further apart than the configured maximum.
    #[error(
        "points {first} and {second} are {distance_m:.0} m apart; the limit is {max_m:.0} m"
    )]
    PointsTooFar {
        /// Earlier point of the pair, in input order.
        first: u64,
        /// Later point of the pair.
        second: u64,
        /// Great-circle distance between them in metres.
        distance_m: f64,
        /// Configured limit in metres.
        max_m: f64,
    },
    /// No fire or no water source, so no pair can be evaluated.
    #[error(
        "at least one fire and one water source are required \
         (got {fire_count} fires, {source_count} sources)"
    )]
    EmptyOrDegenerateSet {
        /// Fire points supplied.
        fire_count: usize,
        /// Water sources supplied.
        source_count: usize,
    },
}

/// A point set that passed every check, together with its hose length.
///
/// Only [`PointSetValidator::validate`] constructs this type, so holding one
/// proves the constraints were enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPointSet {
    points: Vec<Point>,
    hose_length: HoseLength,
    fire_count: usize,
    source_count: usize,
}

impl ValidatedPointSet {
    /// All points in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Fire points in input order.
    pub fn fires(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter().filter(|point| point.is_fire())
    }

    /// Water sources in input order.
    pub fn sources(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter().filter(|point| point.is_water_source())
    }

    /// The validated hose length.
    pub const fn hose_length(&self) -> HoseLength {
        self.hose_length
    }

    /// Number of fire points.
    pub const fn fire_count(&self) -> usize {
        self.fire_count
    }

    /// Number of water sources.
    pub const fn source_count(&self) -> usize {
        self.source_count
    }

    /// Number of (fire, source) pairs an evaluation will route.
    pub const fn pair_count(&self) -> usize {
        self.fire_count * self.source_count
    }
}

/// Enforces [`Constraints`] on raw user input.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hoseline_core::{Point, PointSetValidator};
///
/// let points = vec![
///     Point::fire(1, Coord { x: 11.510, y: 48.140 }),
///     Point::water_source(2, Coord { x: 11.512, y: 48.141 }),
/// ];
/// let set = PointSetValidator::default().validate(points, 500.0)?;
/// assert_eq!((set.fire_count(), set.source_count()), (1, 1));
/// # Ok::<(), hoseline_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointSetValidator {
    constraints: Constraints,
}

impl PointSetValidator {
    /// Build a validator for the given limits.
    pub const fn new(constraints: Constraints) -> Self {
        Self { constraints }
    }

    /// The limits this validator enforces.
    pub const fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Check `points` and `hose_length_m`, returning the set unchanged on
    /// success.
    pub fn validate(
        &self,
        points: Vec<Point>,
        hose_length_m: f64,
    ) -> Result<ValidatedPointSet, ValidationError> {
        let max = self.constraints.max_points;
        if points.len() > max {
            return Err(ValidationError::TooManyPoints {
                count: points.len(),
                max,
            });
        }
        let hose_length = HoseLength::new(hose_length_m, &self.constraints)?;
        check_coordinates(&points)?;
        check_unique_ids(&points)?;
        self.check_pairwise_distance(&points)?;

        let fire_count = points.iter().filter(|point| point.is_fire()).count();
        let source_count = points.len() - fire_count;
        if fire_count == 0 || source_count == 0 {
            return Err(ValidationError::EmptyOrDegenerateSet {
                fire_count,
                source_count,
            });
        }

        Ok(ValidatedPointSet {
            points,
            hose_length,
            fire_count,
            source_count,
        })
    }

    fn check_pairwise_distance(&self, points: &[Point]) -> Result<(), ValidationError> {
        let max_m = self.constraints.max_pairwise_distance_m;
        for (index, first) in points.iter().enumerate() {
            for second in points.iter().skip(index + 1) {
                let distance_m = great_circle_distance(first.location(), second.location());
                if distance_m > max_m {
                    return Err(ValidationError::PointsTooFar {
                        first: first.id(),
                        second: second.id(),
                        distance_m,
                        max_m,
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_coordinates(points: &[Point]) -> Result<(), ValidationError> {
    match points
        .iter()
        .find(|point| !is_valid_coordinate(point.location()))
    {
        Some(point) => Err(ValidationError::InvalidCoordinate {
            id: point.id(),
            latitude: point.latitude(),
            longitude: point.longitude(),
        }),
        None => Ok(()),
    }
}

fn check_unique_ids(points: &[Point]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !seen.insert(point.id()) {
            return Err(ValidationError::DuplicatePointId { id: point.id() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn munich_pair() -> Vec<Point> {
        vec![
            Point::fire(1, Coord { x: 11.510, y: 48.140 }),
            Point::water_source(2, Coord { x: 11.515, y: 48.142 }),
        ]
    }

    #[rstest]
    fn accepts_valid_set_and_preserves_order(munich_pair: Vec<Point>) {
        let set = PointSetValidator::default()
            .validate(munich_pair.clone(), 500.0)
            .expect("valid set");
        assert_eq!(set.points(), munich_pair.as_slice());
        assert_eq!(set.fire_count(), 1);
        assert_eq!(set.source_count(), 1);
        assert_eq!(set.pair_count(), 1);
        assert_eq!(set.hose_length().metres(), 500.0);
    }

    #[rstest]
    fn rejects_more_than_ten_points() {
        let points = (0..11)
            .map(|i| Point::water_source(i, Coord { x: 11.5, y: 48.1 }))
            .collect();
        let err = PointSetValidator::default()
            .validate(points, 500.0)
            .expect_err("too many");
        assert_eq!(err, ValidationError::TooManyPoints { count: 11, max: 10 });
    }

    #[rstest]
    #[case(100.0)]
    #[case(6000.0)]
    fn rejects_hose_length_out_of_range(munich_pair: Vec<Point>, #[case] hose: f64) {
        let err = PointSetValidator::default()
            .validate(munich_pair, hose)
            .expect_err("bad hose");
        assert!(matches!(err, ValidationError::HoseLengthOutOfRange { .. }));
    }

    #[rstest]
    fn rejects_invalid_latitude() {
        let points = vec![
            Point::fire(1, Coord { x: 11.5, y: 1000.0 }),
            Point::water_source(2, Coord { x: 11.5, y: 48.1 }),
        ];
        let err = PointSetValidator::default()
            .validate(points, 500.0)
            .expect_err("bad latitude");
        assert!(matches!(err, ValidationError::InvalidCoordinate { id: 1, .. }));
    }

    #[rstest]
    fn rejects_duplicate_ids() {
        let points = vec![
            Point::fire(4, Coord { x: 11.5, y: 48.1 }),
            Point::water_source(4, Coord { x: 11.5, y: 48.1 }),
        ];
        let err = PointSetValidator::default()
            .validate(points, 500.0)
            .expect_err("duplicate ids");
        assert_eq!(err, ValidationError::DuplicatePointId { id: 4 });
    }

    #[rstest]
    fn rejects_points_too_far_apart() {
        // Munich to Augsburg is roughly 57 km.
        let points = vec![
            Point::fire(1, Coord { x: 11.582, y: 48.135 }),
            Point::water_source(2, Coord { x: 10.898, y: 48.370 }),
        ];
        let err = PointSetValidator::default()
            .validate(points, 500.0)
            .expect_err("too far");
        match err {
            ValidationError::PointsTooFar {
                first,
                second,
                distance_m,
                ..
            } => {
                assert_eq!((first, second), (1, 2));
                assert!(distance_m > 20_000.0);
            }
            other => panic!("expected PointsTooFar, got {other:?}"),
        }
    }

    #[rstest]
    #[case(vec![Point::fire(1, Coord { x: 11.5, y: 48.1 })], 1, 0)]
    #[case(vec![Point::water_source(1, Coord { x: 11.5, y: 48.1 })], 0, 1)]
    #[case(Vec::new(), 0, 0)]
    fn rejects_degenerate_sets(
        #[case] points: Vec<Point>,
        #[case] fire_count: usize,
        #[case] source_count: usize,
    ) {
        let err = PointSetValidator::default()
            .validate(points, 500.0)
            .expect_err("degenerate");
        assert_eq!(
            err,
            ValidationError::EmptyOrDegenerateSet {
                fire_count,
                source_count
            }
        );
    }

    #[rstest]
    fn custom_constraints_are_honoured(munich_pair: Vec<Point>) {
        let validator = PointSetValidator::new(Constraints {
            max_points: 1,
            ..Constraints::default()
        });
        let err = validator
            .validate(munich_pair, 500.0)
            .expect_err("limit of one");
        assert!(matches!(err, ValidationError::TooManyPoints { max: 1, .. }));
    }
}
