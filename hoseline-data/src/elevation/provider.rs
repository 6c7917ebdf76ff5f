//! HTTP-based `ElevationProvider` using the Open-Elevation lookup API.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use hoseline_core::{ElevationProvider, ProviderError};
use log::debug;
use reqwest::Client;

use super::open_elevation::{Location, LookupRequest, LookupResponse};
use crate::http::{HttpProviderConfig, ProviderBuildError};

/// Public Open-Elevation instance.
pub const DEFAULT_ELEVATION_URL: &str = "https://api.open-elevation.com";

/// Elevation lookups are slower than routing; allow them less patience.
pub const DEFAULT_ELEVATION_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP-based elevation provider using `POST {base_url}/api/v1/lookup`.
///
/// # Example
///
/// ```no_run
/// use hoseline_data::HttpElevationProvider;
///
/// let provider = HttpElevationProvider::new(hoseline_data::DEFAULT_ELEVATION_URL)?;
/// # Ok::<(), hoseline_data::ProviderBuildError>(())
/// ```
pub struct HttpElevationProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl std::fmt::Debug for HttpElevationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpElevationProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .finish()
    }
}

impl HttpElevationProvider {
    /// Create a provider for `base_url` with the elevation timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url).with_timeout(DEFAULT_ELEVATION_TIMEOUT))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    fn lookup_url(&self) -> String {
        format!("{}/api/v1/lookup", self.config.base())
    }

    fn convert_response(
        response: LookupResponse,
        expected: usize,
    ) -> Result<Vec<Option<f64>>, ProviderError> {
        if response.results.len() != expected {
            return Err(ProviderError::Parse {
                message: format!(
                    "requested {expected} elevations but received {}",
                    response.results.len()
                ),
            });
        }
        Ok(response
            .results
            .into_iter()
            .map(|result| result.elevation.filter(|value| value.is_finite()))
            .collect())
    }
}

#[async_trait]
impl ElevationProvider for HttpElevationProvider {
    async fn elevations(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<Vec<Option<f64>>, ProviderError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.lookup_url();
        let body = LookupRequest {
            locations: locations
                .iter()
                .map(|coord| Location {
                    latitude: coord.y,
                    longitude: coord.x,
                })
                .collect(),
        };
        debug!("POST {url} ({} locations)", locations.len());

        let response: LookupResponse = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.config.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.config.convert_reqwest_error(&err, &url))?
            .json()
            .await
            .map_err(|err| self.config.convert_reqwest_error(&err, &url))?;

        Self::convert_response(response, locations.len())
    }
}
