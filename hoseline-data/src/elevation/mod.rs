//! Open-Elevation-backed elevation provider.
//!
//! [`HttpElevationProvider`] implements [`hoseline_core::ElevationProvider`]
//! with one batched lookup request per call.

mod open_elevation;
mod provider;

pub use provider::{DEFAULT_ELEVATION_TIMEOUT, DEFAULT_ELEVATION_URL, HttpElevationProvider};
