//! Transport modes used when asking a routing provider for a path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The path profile a hose line is laid along.
///
/// Each mode corresponds to exactly one provider profile; adapters keep the
/// mapping in a single table (see `hoseline_data::routing::ProfileTable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    /// Hose carried on foot along pedestrian ways.
    Walking,
    /// Hose laid from a vehicle on public roads.
    Driving,
    /// Hose trolley; routed like a bicycle.
    Cycling,
    /// Vehicle restricted to drivable service ways.
    #[serde(rename = "Service_Driving", alias = "ServiceDriving")]
    ServiceDriving,
}

impl TransportMode {
    /// All modes in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Walking,
        Self::Driving,
        Self::Cycling,
        Self::ServiceDriving,
    ];

    /// Front-end label for the mode.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::Driving => "Driving",
            Self::Cycling => "Cycling",
            Self::ServiceDriving => "Service_Driving",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known transport mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transport mode '{0}' (expected Walking, Driving, Cycling or Service_Driving)")]
pub struct UnknownTransportMode(pub String);

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "walking" | "walk" => Ok(Self::Walking),
            "driving" | "drive" => Ok(Self::Driving),
            "cycling" | "bike" => Ok(Self::Cycling),
            "servicedriving" | "driveservice" => Ok(Self::ServiceDriving),
            _ => Err(UnknownTransportMode(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Walking", TransportMode::Walking)]
    #[case("drive", TransportMode::Driving)]
    #[case("Cycling", TransportMode::Cycling)]
    #[case("Service_Driving", TransportMode::ServiceDriving)]
    #[case("drive_service", TransportMode::ServiceDriving)]
    fn parses_labels_and_osm_style_ids(#[case] input: &str, #[case] expected: TransportMode) {
        assert_eq!(input.parse::<TransportMode>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_mode() {
        let err = "teleport".parse::<TransportMode>().expect_err("unknown mode");
        assert!(err.to_string().contains("teleport"));
    }

    #[rstest]
    fn display_round_trips_through_from_str() {
        for mode in TransportMode::ALL {
            assert_eq!(mode.to_string().parse::<TransportMode>(), Ok(mode));
        }
    }

    #[rstest]
    fn serde_uses_front_end_labels() {
        let json = serde_json::to_string(&TransportMode::ServiceDriving).expect("serialise");
        assert_eq!(json, r#""Service_Driving""#);
        let parsed: TransportMode = serde_json::from_str(r#""ServiceDriving""#).expect("alias");
        assert_eq!(parsed, TransportMode::ServiceDriving);
    }
}
