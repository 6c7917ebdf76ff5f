//! Open-Elevation lookup API request and response types.
//!
//! See: <https://github.com/Jorl17/open-elevation/blob/master/docs/api.md>

use serde::{Deserialize, Serialize};

/// Body of a `POST /api/v1/lookup` request.
#[derive(Debug, Serialize)]
pub struct LookupRequest {
    /// Coordinates to look up, in order.
    pub locations: Vec<Location>,
}

/// One coordinate in a lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// Lookup response; `results` follows the request order.
#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    /// One entry per requested location.
    pub results: Vec<LookupResult>,
}

/// Elevation for one location. `elevation` is `null` where the service has
/// no data.
#[derive(Debug, Deserialize)]
pub struct LookupResult {
    /// Elevation in metres.
    pub elevation: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialise_request() {
        let request = LookupRequest {
            locations: vec![Location {
                latitude: 48.14,
                longitude: 11.51,
            }],
        };

        let json = serde_json::to_value(&request).expect("should serialise");

        assert_eq!(
            json,
            serde_json::json!({"locations": [{"latitude": 48.14, "longitude": 11.51}]})
        );
    }

    #[test]
    fn deserialise_response_with_nulls() {
        let json = r#"{"results": [
            {"latitude": 48.14, "longitude": 11.51, "elevation": 519.0},
            {"latitude": 0.0, "longitude": 0.0, "elevation": null}
        ]}"#;

        let response: LookupResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].elevation, Some(519.0));
        assert_eq!(response.results[1].elevation, None);
    }
}
