//! Mock provider fixtures

use evict_efile::config::{Credentials, ProviderConfig, RetryConfig};
use evict_efile::{Attachment, CaseFiling, Config};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Retries without meaningful waits
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(50),
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

/// Config talking to `server` with valid-looking credentials
pub fn mock_config(server: &MockServer) -> Config {
    Config {
        credentials: Credentials::new("filer@example.com", "correct horse"),
        provider: ProviderConfig {
            base_url: format!("{}/v4", server.uri()),
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        },
        retry: fast_retry(),
        ..Default::default()
    }
}

/// Mount successful authentication returning `token`
pub async fn mount_authenticate(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/v4/il/user/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": {"auth_token": token}
        })))
        .mount(server)
        .await;
}

/// Mount a payment account list
pub async fn mount_payment_accounts(server: &MockServer, accounts: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v4/il/payment-accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": accounts
        })))
        .mount(server)
        .await;
}

/// Mount a successful filing response with one filing id
pub async fn mount_efile_accepted(server: &MockServer, filing_id: &str) {
    Mock::given(method("POST"))
        .and(path("/v4/il/efile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message_code": 0,
            "item": {
                "envelope_id": "ENV-1",
                "filings": [{"id": filing_id, "status": "submitting"}]
            }
        })))
        .mount(server)
        .await;
}

/// A new eviction complaint in Cook County
pub fn eviction_case() -> CaseFiling {
    serde_json::from_value(serde_json::json!({
        "court_location": "cook:cd1",
        "case_category": "7",
        "case_type": "eviction",
        "filing_code": "complaint",
        "client_matter_number": "LV-2026-014",
        "parties": [
            {"role": "plaintiff", "business_name": "Lakeview Properties LLC"},
            {
                "role": "defendant",
                "first_name": "Jordan",
                "last_name": "Doe",
                "address": {"line1": "100 N State St", "city": "Chicago", "state": "IL", "zip": "60602"}
            }
        ]
    }))
    .unwrap()
}

/// PDF-looking bytes of exactly `size` bytes
pub fn pdf_bytes(size: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec();
    bytes.extend((0..size.saturating_sub(bytes.len())).map(|i| (i % 251) as u8));
    bytes.truncate(size);
    bytes
}

/// In-memory PDF attachment
pub fn pdf_attachment(name: &str, size: usize) -> Attachment {
    Attachment::from_bytes(name, "application/pdf", pdf_bytes(size))
}
