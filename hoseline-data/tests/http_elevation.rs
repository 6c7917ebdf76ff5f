//! Tests for [`HttpElevationProvider`] against a mock Open-Elevation server.

use std::time::Duration;

use geo::Coord;
use hoseline_core::{ElevationProvider, ProviderError};
use hoseline_data::{HttpElevationProvider, HttpProviderConfig};
use rstest::{fixture, rstest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[fixture]
fn locations() -> Vec<Coord<f64>> {
    vec![Coord { x: 11.51, y: 48.14 }, Coord { x: 11.512, y: 48.141 }]
}

fn provider_for(server: &MockServer) -> HttpElevationProvider {
    HttpElevationProvider::new(server.uri()).expect("provider should build")
}

#[rstest]
#[tokio::test]
async fn posts_locations_and_reads_results(locations: Vec<Coord<f64>>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/lookup"))
        .and(body_json(serde_json::json!({
            "locations": [
                {"latitude": 48.14, "longitude": 11.51},
                {"latitude": 48.141, "longitude": 11.512}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"latitude": 48.14, "longitude": 11.51, "elevation": 350.0},
                {"latitude": 48.141, "longitude": 11.512, "elevation": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let values = provider_for(&server)
        .elevations(&locations)
        .await
        .expect("lookup should succeed");

    assert_eq!(values, vec![Some(350.0), None]);
}

#[rstest]
#[case(503, true)]
#[case(429, true)]
#[case(400, false)]
#[tokio::test]
async fn maps_error_status(locations: Vec<Coord<f64>>, #[case] status: u16, #[case] transient: bool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .elevations(&locations)
        .await
        .expect_err("lookup should fail");

    assert!(
        matches!(err, ProviderError::Http { status: s, .. } if s == status),
        "expected HTTP {status}, got {err:?}"
    );
    assert_eq!(err.is_transient(), transient);
}

#[rstest]
#[tokio::test]
async fn rejects_result_count_mismatch(locations: Vec<Coord<f64>>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"latitude": 48.14, "longitude": 11.51, "elevation": 350.0}]
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .elevations(&locations)
        .await
        .expect_err("lookup should fail");

    assert!(matches!(err, ProviderError::Parse { .. }));
}

#[rstest]
#[tokio::test]
async fn reports_timeouts(locations: Vec<Coord<f64>>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(serde_json::json!({"results": []})),
        )
        .mount(&server)
        .await;
    let config = HttpProviderConfig::new(server.uri()).with_timeout(Duration::from_millis(200));
    let provider = HttpElevationProvider::with_config(config).expect("provider should build");

    let err = provider
        .elevations(&locations)
        .await
        .expect_err("lookup should time out");

    assert!(matches!(err, ProviderError::Timeout { .. }), "got {err:?}");
    assert!(err.is_transient());
}

#[rstest]
#[tokio::test]
async fn malformed_body_is_a_parse_error(locations: Vec<Coord<f64>>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .elevations(&locations)
        .await
        .expect_err("lookup should fail");

    assert!(matches!(err, ProviderError::Parse { .. }), "got {err:?}");
    assert!(!err.is_transient());
}

#[rstest]
#[tokio::test]
async fn stalled_body_reports_a_timeout(locations: Vec<Coord<f64>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local address");
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !request.ends_with(b"]}") {
            let read = socket.read(&mut chunk).await.expect("read request");
            if read == 0 {
                break;
            }
            request.extend_from_slice(chunk.get(..read).expect("chunk"));
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 512\r\n\r\n\
                  {\"results\": [",
            )
            .await
            .expect("write partial response");
        tokio::time::sleep(Duration::from_secs(5)).await;
    });
    let config = HttpProviderConfig::new(format!("http://{addr}"))
        .with_timeout(Duration::from_millis(300));
    let provider = HttpElevationProvider::with_config(config).expect("provider should build");

    let err = provider
        .elevations(&locations)
        .await
        .expect_err("lookup should time out");
    server.abort();

    assert!(matches!(err, ProviderError::Timeout { .. }), "got {err:?}");
    assert!(err.is_transient());
}
