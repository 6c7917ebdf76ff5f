//! HTTP adapters for the hoseline providers.
//!
//! Responsibilities:
//! - Implement [`hoseline_core::RoutingProvider`] against an OSRM route
//!   service and [`hoseline_core::ElevationProvider`] against an
//!   Open-Elevation lookup service.
//! - Map transport failures onto [`hoseline_core::ProviderError`] so the core
//!   can decide what to retry.
//!
//! Boundaries:
//! - Do not encode domain rules (those live in `hoseline-core`).
//! - One outbound request per trait call; retrying and caching happen in the
//!   core.
//!
//! Invariants:
//! - Clients are built once and shared; providers are `Send + Sync`.
//! - No global mutable state.

pub mod elevation;
mod http;
pub mod routing;

pub use elevation::{DEFAULT_ELEVATION_TIMEOUT, DEFAULT_ELEVATION_URL, HttpElevationProvider};
pub use http::{DEFAULT_USER_AGENT, HttpProviderConfig, ProviderBuildError};
pub use routing::{HttpRoutingProvider, ProfileTable};
