use std::collections::BTreeMap;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qaflow::{build_submission, ProxyOutcome, ProxySubmitter, TicketSubmitter};

async fn dev_payload() -> qaflow::SubmissionPayload {
    let form = BTreeMap::from([
        ("summary".to_string(), "S".to_string()),
        ("description".to_string(), "D".to_string()),
    ]);
    build_submission(form, "dev", &[]).await.unwrap()
}

#[tokio::test]
async fn test_server_error_becomes_failure_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fn/jsm-proxy/dev-create-support-ticket"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let submitter = ProxySubmitter::new(format!("{}/fn/", server.uri()), "jsm-proxy").unwrap();
    let outcome = submitter
        .submit(&dev_payload().await, "dev-create-support-ticket")
        .await;

    assert_eq!(
        outcome,
        ProxyOutcome::Failure {
            status: Some(500),
            error: "upstream exploded".into(),
        }
    );
    assert_eq!(outcome.to_json()["success"], false);
}

#[tokio::test]
async fn test_success_posts_payload_and_parses_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fn/jsm-proxy/create-support-ticket"))
        .and(body_json(json!({
            "serviceDeskId": 1,
            "requestTypeId": 10,
            "requestFieldValues": { "summary": "S", "description": "D" },
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsmResponse": { "issueKey": "ACC-7" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let submitter = ProxySubmitter::new(format!("{}/fn/", server.uri()), "jsm-proxy").unwrap();
    let outcome = submitter
        .submit(&dev_payload().await, "create-support-ticket")
        .await;

    assert_eq!(
        outcome,
        ProxyOutcome::Success {
            data: json!({ "jsmResponse": { "issueKey": "ACC-7" } }),
        }
    );
}

#[tokio::test]
async fn test_non_json_success_body_is_kept_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let submitter = ProxySubmitter::new(format!("{}/", server.uri()), "fn").unwrap();
    let outcome = submitter.submit(&dev_payload().await, "x").await;
    assert_eq!(
        outcome,
        ProxyOutcome::Success {
            data: json!("created"),
        }
    );
}

#[tokio::test]
async fn test_unreachable_proxy_is_failure_without_status() {
    let submitter = ProxySubmitter::new("http://127.0.0.1:1/", "fn").unwrap();
    let outcome = submitter.submit(&dev_payload().await, "x").await;
    assert!(matches!(
        outcome,
        ProxyOutcome::Failure { status: None, .. }
    ));
}
