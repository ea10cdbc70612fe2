use super::*;
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SOURCE: &str = "http://example.js.org";
const TARGET: &str = "example.github.io";

/// Probe that answers every request with a fixed response and records the URLs.
struct MockProbe {
    response: Result<ProbeResponse, String>,
    requests: Mutex<Vec<String>>,
}

impl MockProbe {
    fn answering(status: u16, location: Option<&str>) -> Self {
        Self {
            response: Ok(ProbeResponse {
                status,
                location: location.map(str::to_string),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RedirectProbe for MockProbe {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, RedirectError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.response
            .clone()
            .map_err(|message| RedirectError::RequestFailed {
                url: url.to_string(),
                message,
            })
    }
}

#[test]
fn test_normalize_location() {
    assert_eq!(normalize_location("https://example.js.org/"), "http://example.js.org");
    assert_eq!(normalize_location("https://example.js.org"), "http://example.js.org");
    assert_eq!(normalize_location("http://example.js.org/"), "http://example.js.org");
    assert_eq!(normalize_location("http://example.js.org//"), "http://example.js.org/");
    assert_eq!(normalize_location(""), "");
}

#[tokio::test]
async fn test_verify_redirect_success() {
    let probe = MockProbe::answering(301, Some("https://example.js.org/"));

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    assert_eq!(result, Ok(()));
    assert_eq!(
        *probe.requests.lock().unwrap(),
        vec!["https://example.github.io".to_string()]
    );
}

#[tokio::test]
async fn test_verify_redirect_not_found() {
    let probe = MockProbe::answering(404, None);

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    let failure = result.unwrap_err();
    assert!(failure.is_not_found());
    assert_eq!(
        failure.to_string(),
        "`example.github.io` responds with a 404 error"
    );
}

#[tokio::test]
async fn test_verify_redirect_without_redirect_status() {
    let probe = MockProbe::answering(200, None);

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    assert_eq!(
        result,
        Err(RedirectFailure::RedirectNotConfigured {
            target: TARGET.to_string(),
            status: 200
        })
    );
}

#[tokio::test]
async fn test_verify_redirect_ignores_location_on_non_redirect_status() {
    let probe = MockProbe::answering(200, Some("https://example.js.org"));

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    assert!(matches!(
        result,
        Err(RedirectFailure::RedirectNotConfigured { status: 200, .. })
    ));
}

#[tokio::test]
async fn test_verify_redirect_missing_location() {
    let probe = MockProbe::answering(302, None);

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    let failure = result.unwrap_err();
    assert_eq!(
        failure,
        RedirectFailure::MissingLocation {
            target: TARGET.to_string(),
            source: SOURCE.to_string()
        }
    );
    assert_eq!(
        failure.to_string(),
        "`example.github.io` is not redirecting to `http://example.js.org`"
    );
}

#[tokio::test]
async fn test_verify_redirect_wrong_location() {
    let probe = MockProbe::answering(301, Some("https://other.js.org/"));

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    let failure = result.unwrap_err();
    assert_eq!(
        failure.to_string(),
        "`example.github.io` is redirecting to `http://other.js.org` instead of `http://example.js.org`"
    );
}

#[tokio::test]
async fn test_verify_redirect_location_with_path_does_not_match() {
    let probe = MockProbe::answering(301, Some("https://example.js.org/docs/"));

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    assert!(matches!(result, Err(RedirectFailure::WrongLocation { .. })));
}

#[tokio::test]
async fn test_verify_redirect_network_error() {
    let probe = MockProbe::failing("connection refused");

    let result = verify_redirect(&probe, SOURCE, TARGET).await;

    match result {
        Err(RedirectFailure::Network { target, message }) => {
            assert_eq!(target, TARGET);
            assert!(message.contains("connection refused"));
        }
        other => panic!("Expected a network failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_probe_does_not_follow_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", "https://example.js.org/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let probe = HttpRedirectProbe::new(Duration::from_secs(5)).unwrap();
    let response = probe.probe(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(
        response,
        ProbeResponse {
            status: 301,
            location: Some("https://example.js.org/".to_string())
        }
    );
}

#[tokio::test]
async fn test_http_probe_reports_plain_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let probe = HttpRedirectProbe::new(Duration::from_secs(5)).unwrap();
    let response = probe.probe(&server.uri()).await.unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.location, None);
}

#[tokio::test]
async fn test_http_probe_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let probe = HttpRedirectProbe::new(Duration::from_millis(100)).unwrap();
    let result = probe.probe(&server.uri()).await;

    assert!(matches!(result, Err(RedirectError::Timeout { .. })));
}
