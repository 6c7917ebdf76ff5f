//! Elevation profiles and their summary statistics.

use serde::{Deserialize, Serialize};

/// One elevation reading along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    /// Distance from the water source along the route, in metres.
    pub distance_m: f64,
    /// Terrain elevation above sea level, in metres.
    pub elevation_m: f64,
}

/// Which way water runs between source and fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// The fire is higher than the source.
    Uphill,
    /// The fire is lower than the source.
    Downhill,
    /// Both endpoints are at the same height.
    Level,
}

/// Elevation along a route, oriented from the water source to the fire.
///
/// # Examples
/// ```
/// use hoseline_core::{ElevationProfile, ElevationSample, Flow};
///
/// let profile = ElevationProfile::from_samples(vec![
///     ElevationSample { distance_m: 0.0, elevation_m: 350.0 },
///     ElevationSample { distance_m: 120.0, elevation_m: 340.0 },
///     ElevationSample { distance_m: 300.0, elevation_m: 400.0 },
/// ])
/// .expect("non-empty profile");
/// assert_eq!(profile.delta_m, 50.0);
/// assert_eq!(profile.ascent_m, 60.0);
/// assert_eq!(profile.descent_m, 10.0);
/// assert_eq!(profile.flow(), Flow::Uphill);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    /// Readings ordered by distance from the source.
    pub samples: Vec<ElevationSample>,
    /// Fire elevation minus source elevation.
    pub delta_m: f64,
    /// Sum of all climbs between consecutive samples.
    pub ascent_m: f64,
    /// Sum of all drops between consecutive samples.
    pub descent_m: f64,
}

impl ElevationProfile {
    /// Summarise `samples`. Returns `None` when there are no samples.
    pub fn from_samples(samples: Vec<ElevationSample>) -> Option<Self> {
        let first = samples.first()?.elevation_m;
        let last = samples.last()?.elevation_m;
        let (ascent_m, descent_m) =
            samples
                .windows(2)
                .fold((0.0, 0.0), |(up, down), pair| match pair {
                    [a, b] => {
                        let step = b.elevation_m - a.elevation_m;
                        if step > 0.0 {
                            (up + step, down)
                        } else {
                            (up, down - step)
                        }
                    }
                    _ => (up, down),
                });
        Some(Self {
            samples,
            delta_m: last - first,
            ascent_m,
            descent_m,
        })
    }

    /// Elevation at the water source.
    pub fn source_elevation(&self) -> Option<f64> {
        self.samples.first().map(|s| s.elevation_m)
    }

    /// Elevation at the fire point.
    pub fn fire_elevation(&self) -> Option<f64> {
        self.samples.last().map(|s| s.elevation_m)
    }

    /// Direction of flow implied by [`Self::delta_m`].
    pub fn flow(&self) -> Flow {
        if self.delta_m > 0.0 {
            Flow::Uphill
        } else if self.delta_m < 0.0 {
            Flow::Downhill
        } else {
            Flow::Level
        }
    }
}

/// Elevation status attached to a reachability outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Elevation {
    /// The caller did not ask for elevation, or the fire is unreachable.
    #[default]
    NotRequested,
    /// Elevation was requested but could not be determined.
    Unavailable {
        /// Why no profile was produced.
        reason: String,
    },
    /// Elevation along the best route.
    Profile(ElevationProfile),
}

impl Elevation {
    /// The profile, when one was computed.
    pub const fn profile(&self) -> Option<&ElevationProfile> {
        match self {
            Self::Profile(profile) => Some(profile),
            Self::NotRequested | Self::Unavailable { .. } => None,
        }
    }
}
