//! HTTP-based `RoutingProvider` using OSRM's Route API.

use async_trait::async_trait;
use geo::{Coord, LineString};
use hoseline_core::{ProviderError, RouteResult, RoutingError, RoutingProvider, TransportMode};
use log::debug;
use reqwest::Client;

use super::osrm::RouteResponse;
use super::profile::ProfileTable;
use crate::http::{HttpProviderConfig, ProviderBuildError};

/// HTTP-based routing provider using the OSRM Route API.
///
/// The client is built once and reused for every request. OSRM answers
/// `NoRoute` and `NoSegment` become [`RoutingError::NoRouteFound`]; every
/// other failure becomes [`RoutingError::ProviderUnavailable`].
pub struct HttpRoutingProvider {
    client: Client,
    config: HttpProviderConfig,
    profiles: ProfileTable,
}

impl std::fmt::Debug for HttpRoutingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRoutingProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("profiles", &self.profiles)
            .finish()
    }
}

impl HttpRoutingProvider {
    /// Create a new provider with default configuration and profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url), ProfileTable::default())
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(
        config: HttpProviderConfig,
        profiles: ProfileTable,
    ) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            profiles,
        })
    }

    /// Build the OSRM Route API URL.
    ///
    /// The URL format is:
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`.
    fn build_route_url(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.config.base(),
            self.profiles.profile(mode),
            origin.x,
            origin.y,
            destination.x,
            destination.y
        )
    }

    async fn fetch_route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<RouteResult, RoutingError> {
        let url = self.build_route_url(origin, destination, mode);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.config.convert_reqwest_error(&err, &url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.config.convert_reqwest_error(&err, &url))?;

        // OSRM reports NoRoute and friends as JSON on 4xx responses, so the
        // body is inspected before the status.
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => Self::convert_response(parsed, origin, destination, mode),
            Err(_) if !status.is_success() => Err(ProviderError::Http {
                url,
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned(),
            }
            .into()),
            Err(err) => Err(ProviderError::Parse {
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Convert an OSRM response to a `RouteResult`.
    fn convert_response(
        response: RouteResponse,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<RouteResult, RoutingError> {
        if response.is_no_route() {
            return Err(RoutingError::NoRouteFound { mode });
        }
        if !response.is_ok() {
            return Err(ProviderError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            }
            .into());
        }

        let Some(route) = response.routes.into_iter().next() else {
            return Err(RoutingError::NoRouteFound { mode });
        };
        if !(route.distance.is_finite() && route.distance >= 0.0) {
            return Err(ProviderError::Parse {
                message: format!("OSRM returned invalid distance {}", route.distance),
            }
            .into());
        }

        let result = match route.geometry {
            Some(geometry) if geometry.coordinates.len() >= 2 => RouteResult::new(
                route.distance,
                geometry
                    .coordinates
                    .into_iter()
                    .map(|[x, y]| Coord { x, y })
                    .collect::<LineString<f64>>(),
            ),
            _ => RouteResult::straight(route.distance, origin, destination),
        };
        Ok(result)
    }
}

#[async_trait]
impl RoutingProvider for HttpRoutingProvider {
    async fn route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mode: TransportMode,
    ) -> Result<RouteResult, RoutingError> {
        self.fetch_route(origin, destination, mode).await
    }
}
