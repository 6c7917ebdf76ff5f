//! OSRM-backed routing provider.
//!
//! [`HttpRoutingProvider`] implements [`hoseline_core::RoutingProvider`] on
//! top of the OSRM Route service. Each transport mode is mapped to one OSRM
//! profile through a [`ProfileTable`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use hoseline_data::{HttpProviderConfig, HttpRoutingProvider, ProfileTable};
//! use hoseline_core::TransportMode;
//!
//! let config = HttpProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10));
//! let profiles = ProfileTable::default().with_profile(TransportMode::Cycling, "bicycle");
//! let provider = HttpRoutingProvider::with_config(config, profiles)?;
//! # Ok::<(), hoseline_data::ProviderBuildError>(())
//! ```

mod osrm;
mod profile;
mod provider;

pub use profile::ProfileTable;
pub use provider::HttpRoutingProvider;
