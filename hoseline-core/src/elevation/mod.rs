//! Elevation along resolved routes.
//!
//! Water flows from the source to the fire, so every profile runs from the
//! water source (distance 0) to the fire point. A positive delta means the
//! fire sits uphill of the source and the pump has to lift the water.

mod annotator;
mod error;
mod profile;
mod provider;

pub use annotator::{DEFAULT_MAX_SAMPLES, ElevationAnnotator};
pub use error::ElevationError;
pub use profile::{Elevation, ElevationProfile, ElevationSample, Flow};
pub use provider::ElevationProvider;
