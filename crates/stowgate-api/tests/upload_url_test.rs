//! Upload URL API integration tests.
//!
//! Run with: `cargo test -p stowgate-api --test upload_url_test`
//! Backends are in-memory fakes; no AWS access is needed.

mod helpers;

use helpers::{SignerMode, TestAppBuilder};
use serde_json::json;
use stowgate_core::{ServiceTier, SignedUrl, UploadRequest};

fn upload_body(sub: &str, file_request: &str, file_size: i64) -> serde_json::Value {
    json!({
        "email": "ada@example.com",
        "sub": sub,
        "user_name": "Ada",
        "file_request": file_request,
        "file_size": file_size,
    })
}

#[tokio::test]
async fn test_free_tier_within_quota_gets_url() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "models/run.bin", 5_000_000))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("access-control-allow-origin").to_str().unwrap(),
        "*"
    );
    assert_eq!(
        response.header("access-control-allow-methods").to_str().unwrap(),
        "*"
    );
    let signed = response.json::<SignedUrl>();
    assert!(!signed.url.is_empty());
    assert!(signed.url.contains("acme/models/run.bin"));
    assert!(signed.url.contains("X-Amz-Expires=259200"));
    assert_eq!(app.signed_keys(), vec!["acme/models/run.bin".to_string()]);
}

#[tokio::test]
async fn test_free_tier_over_quota_is_rejected() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .stored("acme", vec![9_999_999])
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", 2))
        .await;

    assert_eq!(response.status_code(), 400);
    let message = response.text();
    assert!(message.starts_with("quota exceeded"), "{}", message);
    assert!(message.contains("10000000"));
    assert!(app.signed_keys().is_empty());
}

#[tokio::test]
async fn test_unknown_subject_is_invalid_user() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Enterprise, true)
        .build();

    let mut body = upload_body("ghost", "a.txt", 1);
    body["company_id"] = json!("acme");

    let response = app.client().post("/upload-url").json(&body).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "Invalid User Request");
    assert!(app.listed_prefixes().is_empty());
    assert!(app.signed_keys().is_empty());
}

#[tokio::test]
async fn test_malformed_json_returns_parse_error() {
    let app = TestAppBuilder::new().build();
    let body = "{\"sub\": \"user-1\", \"file_request\": ";

    let expected = serde_json::from_str::<UploadRequest>(body)
        .unwrap_err()
        .to_string();

    let response = app.client().post("/upload-url").text(body).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), expected);
}

#[tokio::test]
async fn test_unpaid_enterprise_account_is_denied() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Enterprise, false)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", 1))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("not paid"));
    assert!(app.signed_keys().is_empty());
}

#[tokio::test]
async fn test_client_supplied_namespace_is_ignored() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Standard, true)
        .account("user-2", "globex", ServiceTier::Standard, true)
        .build();

    let mut body = upload_body("user-1", "reports/q1.csv", 100);
    body["company_id"] = json!("globex");
    body["service_tier"] = json!(2);
    body["payed"] = json!(true);

    let response = app.client().post("/upload-url").json(&body).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.signed_keys(), vec!["acme/reports/q1.csv".to_string()]);
    assert!(app.listed_prefixes().iter().all(|prefix| prefix == "acme/"));
}

#[tokio::test]
async fn test_usage_is_summed_across_pages() {
    // Five objects at two per page: three listing calls.
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .stored("acme", vec![2_000_000; 5])
        .build();

    let at_ceiling = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", 0))
        .await;
    assert_eq!(at_ceiling.status_code(), 400);
    assert_eq!(app.listed_prefixes().len(), 3);
}

#[tokio::test]
async fn test_exactly_reaching_ceiling_is_allowed() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .stored("acme", vec![3_000_000, 3_000_000, 3_000_000])
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", 1_000_000))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_missing_file_size_counts_as_zero() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .stored("acme", vec![9_999_999])
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&json!({"sub": "user-1", "file_request": "a.txt"}))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_negative_file_size_is_malformed() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", -1))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("file_size"));
    assert!(app.listed_prefixes().is_empty());
}

#[tokio::test]
async fn test_oversized_file_is_malformed() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Enterprise, true)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body(
            "user-1",
            "a.bin",
            helpers::MAX_UPLOAD_SIZE_BYTES + 1,
        ))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("maximum"));
}

#[tokio::test]
async fn test_path_traversal_is_malformed() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Enterprise, true)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "../globex/secrets.txt", 1))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains(".."));
    assert!(app.signed_keys().is_empty());
}

#[tokio::test]
async fn test_signing_failure_hides_detail() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Standard, true)
        .signer(SignerMode::Fail)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", 1))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "Unable to sign URL");
}

#[tokio::test]
async fn test_empty_signed_url_is_failure() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Standard, true)
        .signer(SignerMode::ReturnEmpty)
        .build();

    let response = app
        .client()
        .post("/upload-url")
        .json(&upload_body("user-1", "a.txt", 1))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "Unable to sign URL");
}

#[tokio::test]
async fn test_root_path_serves_upload_url() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Free, true)
        .build();

    let response = app
        .client()
        .post("/")
        .json(&upload_body("user-1", "a.txt", 1))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestAppBuilder::new().build();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_keys_that_would_be_normalized_are_malformed() {
    let app = TestAppBuilder::new()
        .account("user-1", "acme", ServiceTier::Enterprise, true)
        .build();

    for key in ["a//b.txt", "./x.txt", "dir/"] {
        let response = app
            .client()
            .post("/upload-url")
            .json(&upload_body("user-1", key, 1))
            .await;
        assert_eq!(response.status_code(), 400, "{}", key);
    }
    assert!(app.signed_keys().is_empty());
}
