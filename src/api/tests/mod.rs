use super::*;
use crate::config::{Credentials, ProviderConfig, RetryConfig};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod tyler;

const BOUNDARY: &str = "efile-test-boundary";

/// Config pointing at a mock provider, with fast retries
fn test_config(server: &MockServer) -> Config {
    Config {
        credentials: Credentials::new("filer@example.com", "pw"),
        provider: ProviderConfig {
            base_url: format!("{}/v4", server.uri()),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        },
        retry: RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        ..Default::default()
    }
}

fn create_test_app(config: Config) -> Router {
    let service = Arc::new(SubmissionService::from_config(&config).unwrap());
    create_router(service, Arc::new(config))
}

async fn mount_auth_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v4/il/user/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": {"auth_token": "T"}
        })))
        .mount(server)
        .await;
}

async fn mount_accounts_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v4/il/payment-accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": [{"id": "acct-1", "name": "Firm Card"}]
        })))
        .mount(server)
        .await;
}

/// One multipart part: (field name, optional file name + content type, bytes)
struct Part<'a> {
    name: &'a str,
    file: Option<(&'a str, &'a str)>,
    bytes: Vec<u8>,
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        part.name, file_name, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_starts_and_shuts_down() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);
    let service = Arc::new(SubmissionService::from_config(&config).unwrap());

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server_with_shutdown(service, config, async move {
        rx.await.ok();
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["*".to_string()];
    let app = create_test_app(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.api.cors_origins = vec!["http://localhost:5173".to_string()];
    let app = create_test_app(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:5173"
    );

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.api.cors_enabled = false;
    let app = create_test_app(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}
