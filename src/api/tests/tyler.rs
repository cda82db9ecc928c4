use super::*;

fn case_json() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "court_location": "cook:cd1",
        "case_type": "eviction",
        "filing_code": "complaint",
        "parties": [
            {"role": "plaintiff", "business_name": "Lakeview Properties LLC"},
            {"role": "defendant", "first_name": "Jordan", "last_name": "Doe"}
        ]
    }))
    .unwrap()
}

fn pdf_bytes(size: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(size, b'0');
    bytes
}

#[tokio::test]
async fn test_authenticate_success() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    let app = create_test_app(test_config(&server));

    let request = Request::builder()
        .method("POST")
        .uri("/api/tyler/authenticate")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["token"], "T");
    assert!(json["expires"].is_string());
}

#[tokio::test]
async fn test_authenticate_missing_credentials() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.credentials = Credentials::new("", "");
    let app = create_test_app(config);

    let request = Request::builder()
        .method("POST")
        .uri("/api/tyler/authenticate")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"], "authentication_error");
    assert_eq!(json["code"], "missing_credentials");
}

#[tokio::test]
async fn test_authenticate_rejected_by_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/il/user/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 1002,
            "message": "Account locked"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(test_config(&server));

    let request = Request::builder()
        .method("POST")
        .uri("/api/tyler/authenticate")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["code"], "1002");
    assert!(json["message"].as_str().unwrap().contains("Account locked"));
}

#[tokio::test]
async fn test_payment_accounts_success() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    mount_accounts_ok(&server).await;
    let app = create_test_app(test_config(&server));

    let request = Request::builder()
        .uri("/api/tyler/payment-accounts")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["fallback"], false);
    assert_eq!(json["accounts"][0]["id"], "acct-1");
    assert_eq!(json["accounts"][0]["name"], "Firm Card");
}

#[tokio::test]
async fn test_payment_accounts_fallback_is_still_ok() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/v4/il/payment-accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 5003,
            "message": "Database error"
        })))
        .mount(&server)
        .await;
    let app = create_test_app(test_config(&server));

    let request = Request::builder()
        .uri("/api/tyler/payment-accounts")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["fallback"], true);
    assert_eq!(
        json["accounts"],
        serde_json::json!([{"id": "demo", "name": "Demo Account (Fallback)"}])
    );
}

#[tokio::test]
async fn test_submit_creates_filing() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    mount_accounts_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/v4/il/efile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": {"envelope_id": "E-9", "filings": [{"id": "F-100", "status": "submitting"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[
            Part {
                name: "case",
                file: None,
                bytes: case_json(),
            },
            Part {
                name: "file",
                file: Some(("complaint.pdf", "application/pdf")),
                bytes: pdf_bytes(4096),
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["envelope_id"], "E-9");
    assert_eq!(json["filings"][0]["id"], "F-100");
    assert_eq!(json["payment_account"]["id"], "acct-1");
}

#[tokio::test]
async fn test_submit_accepts_uploads_above_default_body_limit() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    mount_accounts_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/v4/il/efile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": {"filings": [{"id": "F-101"}]}
        })))
        .mount(&server)
        .await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[
            Part {
                name: "case",
                file: None,
                bytes: case_json(),
            },
            Part {
                name: "file",
                file: Some(("exhibits.pdf", "application/pdf")),
                bytes: pdf_bytes(3 * 1024 * 1024),
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_submit_missing_case() {
    let server = MockServer::start().await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[Part {
            name: "file",
            file: Some(("complaint.pdf", "application/pdf")),
            bytes: pdf_bytes(128),
        }],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "missing_case");
}

#[tokio::test]
async fn test_submit_invalid_case_json() {
    let server = MockServer::start().await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[
            Part {
                name: "case",
                file: None,
                bytes: b"{\"court_location\": 5".to_vec(),
            },
            Part {
                name: "file",
                file: Some(("complaint.pdf", "application/pdf")),
                bytes: pdf_bytes(128),
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "invalid_case");
}

#[tokio::test]
async fn test_submit_without_files() {
    let server = MockServer::start().await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[Part {
            name: "case",
            file: None,
            bytes: case_json(),
        }],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "missing_file");
}

#[tokio::test]
async fn test_submit_rejects_unsupported_file_type() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    mount_accounts_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/v4/il/efile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[
            Part {
                name: "case",
                file: None,
                bytes: case_json(),
            },
            Part {
                name: "file",
                file: Some(("photo.png", "image/png")),
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["code"], "unsupported_file_type");
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("photo.png"));
    assert!(message.contains("PDF") && message.contains("DOCX"));
}

#[tokio::test]
async fn test_submit_rejects_oversized_file() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    mount_accounts_ok(&server).await;
    let mut config = test_config(&server);
    config.attachments.max_size_bytes = 1024;
    let app = create_test_app(config);

    let request = multipart_request(
        "/api/tyler/submit",
        &[
            Part {
                name: "case",
                file: None,
                bytes: case_json(),
            },
            Part {
                name: "file",
                file: Some(("big.pdf", "application/pdf")),
                bytes: pdf_bytes(2048),
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["code"], "file_too_large");
}

#[tokio::test]
async fn test_submit_surfaces_provider_rejection() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    mount_accounts_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/v4/il/efile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 2002,
            "message": "Invalid filing code"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(test_config(&server));

    let request = multipart_request(
        "/api/tyler/submit",
        &[
            Part {
                name: "case",
                file: None,
                bytes: case_json(),
            },
            Part {
                name: "file",
                file: Some(("complaint.pdf", "application/pdf")),
                bytes: pdf_bytes(256),
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"], "submission_error");
    assert_eq!(json["code"], "2002");
    assert_eq!(json["details"]["kind"], "submission");
}
