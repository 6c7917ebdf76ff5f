//! Process-wide limits applied to every request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Shortest hose length accepted, in metres.
pub const MIN_HOSE_LENGTH_M: f64 = 120.0;
/// Longest hose length accepted, in metres.
pub const MAX_HOSE_LENGTH_M: f64 = 5000.0;
/// Largest number of points in one request.
pub const MAX_POINTS: usize = 10;
/// Largest great-circle distance between any two points, in metres.
pub const MAX_PAIRWISE_DISTANCE_M: f64 = 20_000.0;

/// Limits enforced by [`PointSetValidator`](crate::PointSetValidator).
///
/// Loaded once at start-up and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Inclusive lower bound on the hose length.
    pub min_hose_length_m: f64,
    /// Inclusive upper bound on the hose length.
    pub max_hose_length_m: f64,
    /// Maximum number of points per request.
    pub max_points: usize,
    /// Maximum great-circle distance between any two points.
    pub max_pairwise_distance_m: f64,
}

impl Constraints {
    /// The limits used when nothing is configured.
    pub const DEFAULT: Self = Self {
        min_hose_length_m: MIN_HOSE_LENGTH_M,
        max_hose_length_m: MAX_HOSE_LENGTH_M,
        max_points: MAX_POINTS,
        max_pairwise_distance_m: MAX_PAIRWISE_DISTANCE_M,
    };
}

impl Default for Constraints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A hose length already checked against [`Constraints`].
///
/// # Examples
/// ```
/// use hoseline_core::{Constraints, HoseLength};
///
/// let hose = HoseLength::new(500.0, &Constraints::default())?;
/// assert_eq!(hose.metres(), 500.0);
/// assert!(HoseLength::new(50.0, &Constraints::default()).is_err());
/// # Ok::<(), hoseline_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct HoseLength(f64);

impl HoseLength {
    /// Validate `metres` against the configured range. NaN is rejected.
    pub fn new(metres: f64, constraints: &Constraints) -> Result<Self, ValidationError> {
        if (constraints.min_hose_length_m..=constraints.max_hose_length_m).contains(&metres) {
            Ok(Self(metres))
        } else {
            Err(ValidationError::HoseLengthOutOfRange {
                value: metres,
                min: constraints.min_hose_length_m,
                max: constraints.max_hose_length_m,
            })
        }
    }

    /// Length in metres.
    pub const fn metres(self) -> f64 {
        self.0
    }

    /// Whether a route of `distance_m` can be spanned by this hose.
    pub fn spans(self, distance_m: f64) -> bool {
        distance_m <= self.0
    }
}

impl fmt::Display for HoseLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(120.0)]
    #[case(5000.0)]
    #[case(1000.0)]
    fn accepts_inclusive_bounds(#[case] metres: f64) {
        assert!(HoseLength::new(metres, &Constraints::default()).is_ok());
    }

    #[rstest]
    #[case(119.9)]
    #[case(5000.1)]
    #[case(f64::NAN)]
    #[case(-1.0)]
    fn rejects_out_of_range(#[case] metres: f64) {
        let err = HoseLength::new(metres, &Constraints::default()).expect_err("out of range");
        assert!(matches!(err, ValidationError::HoseLengthOutOfRange { .. }));
    }

    #[rstest]
    fn spans_is_inclusive() {
        let hose = HoseLength::new(300.0, &Constraints::default()).expect("valid hose");
        assert!(hose.spans(300.0));
        assert!(!hose.spans(300.5));
    }

    #[rstest]
    fn partial_config_keeps_defaults() {
        let constraints: Constraints =
            serde_json::from_str(r#"{"max_points": 6}"#).expect("partial constraints");
        assert_eq!(constraints.max_points, 6);
        assert_eq!(constraints.max_hose_length_m, MAX_HOSE_LENGTH_M);
    }
}
