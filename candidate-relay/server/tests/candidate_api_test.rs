use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use candidate_relay_core::{
    model::{CandidateField, NewCandidate, RecipientClass},
    ServerInfo,
};
use candidate_relay_server::{new_router, store::MemoryRecordStore, CandidateService, ServiceState};
use chrono::Utc;
use notification::{Notification, NotificationClient};
use relay_metrics::RelayMetrics;
use serde_json::{json, Value};

/// Mail sender that records what it was given, or fails with a fixed status.
#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail_with: Option<u16>,
}

impl RecordingMailer {
    fn failing(status: u16) -> Self { Self { fail_with: Some(status), ..Self::default() } }

    fn sent(&self) -> Vec<Notification> { self.sent.lock().unwrap().clone() }
}

#[async_trait]
impl NotificationClient for RecordingMailer {
    async fn send_notification(&self, notification: &Notification) -> Result<(), notification::Error> {
        match self.fail_with {
            Some(status @ (401 | 403)) => Err(notification::Error::AccessDenied {
                status,
                message: "Delegation denied".to_string(),
            }),
            Some(status) => Err(notification::Error::SendEmail {
                status,
                message: "Backend error".to_string(),
            }),
            None => {
                self.sent.lock().unwrap().push(notification.clone());
                Ok(())
            }
        }
    }
}

fn server_info() -> ServerInfo {
    ServerInfo {
        version: "0.1.0".to_string(),
        branch: "main".to_string(),
        commit_hash: "0000000".to_string(),
        store: "memory".to_string(),
        mailer: "console".to_string(),
        start_time: Utc::now(),
    }
}

fn test_server(mailer: RecordingMailer) -> TestServer {
    let service = CandidateService::new(
        Arc::new(MemoryRecordStore::new()),
        Arc::new(mailer),
        RelayMetrics::new().unwrap(),
    );
    TestServer::new(new_router(&ServiceState::new(service), server_info())).unwrap()
}

async fn create_jane(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/candidates")
        .json(&json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "currentCompany": "Acme",
            "location": "Berlin",
            "expectedSalary": "120k",
            "skills": ["Go", "Rust", "SQL", "Kubernetes"],
            "customFields": { "Visa Status": "H1B" },
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn server_info_is_served_at_root_and_info() {
    let server = test_server(RecordingMailer::default());

    for path in ["/", "/api/v1/info"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["store"], "memory");
        assert_eq!(body["data"]["version"], "0.1.0");
    }

    let response = server.get("/openapi.json").await;
    response.assert_status_ok();
    let spec = response.json::<Value>();
    assert!(spec["paths"]["/api/v1/candidates/{id}/emails/{recipient}/send"].is_object());
}

#[tokio::test]
async fn create_builds_all_visible_matrix() {
    let server = test_server(RecordingMailer::default());
    let id = create_jane(&server).await;

    let response = server.get(&format!("/api/v1/candidates/{id}")).await;
    response.assert_status_ok();
    let candidate = response.json::<Value>()["data"].clone();
    assert_eq!(candidate["name"], "Jane Doe");
    assert_eq!(candidate["phoneNumber"], Value::Null);
    assert!(candidate["createdAt"].is_string());

    let response = server.get(&format!("/api/v1/candidates/{id}/visibility")).await;
    response.assert_status_ok();
    let matrix = response.json::<Value>()["data"].clone();
    let matrix = matrix.as_object().unwrap();
    assert_eq!(matrix.len(), 11);
    for toggle in matrix.values() {
        assert_eq!(toggle, &json!({ "client": true, "internal": true, "superiors": true }));
    }
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let server = test_server(RecordingMailer::default());

    let response = server
        .post("/api/v1/candidates")
        .json(&json!({ "name": "  ", "email": "jane@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/candidates")
        .json(&json!({ "name": "Jane Doe", "email": "jane-at-example" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["message"], "Invalid email format: jane-at-example");

    let response = server.get("/api/v1/candidates").await;
    assert_eq!(response.json::<Value>()["data"], json!([]));
}

#[tokio::test]
async fn list_keeps_capture_order_and_filters() {
    let server = test_server(RecordingMailer::default());
    let jane = create_jane(&server).await;
    let response = server
        .post("/api/v1/candidates")
        .json(&json!({ "name": "John Roe", "email": "john@example.com", "location": "Paris" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server.get("/api/v1/candidates").await;
    let names: Vec<Value> = response.json::<Value>()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|candidate| candidate["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Jane Doe"), json!("John Roe")]);

    let response = server.get("/api/v1/candidates").add_query_param("search", "RUST").await;
    let found = response.json::<Value>()["data"].clone();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], json!(jane));
}

#[tokio::test]
async fn update_clears_fields_and_extends_matrix() {
    let server = test_server(RecordingMailer::default());
    let response = server
        .post("/api/v1/candidates")
        .json(&json!({ "name": "John Roe", "email": "john@example.com", "location": "Paris" }))
        .await;
    let id = response.json::<Value>()["data"]["id"].as_str().unwrap().to_string();

    let response = server.get(&format!("/api/v1/candidates/{id}/visibility")).await;
    assert!(response.json::<Value>()["data"].get("customFields").is_none());

    let response = server
        .patch(&format!("/api/v1/candidates/{id}"))
        .json(&json!({ "location": "", "customFields": { "Notice": "1 month" } }))
        .await;
    response.assert_status_ok();
    let candidate = response.json::<Value>()["data"].clone();
    assert_eq!(candidate["location"], Value::Null);
    assert_eq!(candidate["id"], json!(id));

    let response = server.get(&format!("/api/v1/candidates/{id}/visibility")).await;
    assert_eq!(
        response.json::<Value>()["data"]["customFields"],
        json!({ "client": true, "internal": true, "superiors": true })
    );

    let response = server
        .patch(&format!("/api/v1/candidates/{id}"))
        .json(&json!({ "email": "nope" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let response = server.get(&format!("/api/v1/candidates/{id}")).await;
    assert_eq!(response.json::<Value>()["data"]["email"], "john@example.com");
}

#[tokio::test]
async fn update_with_empty_custom_fields_clears_them() {
    let server = test_server(RecordingMailer::default());
    let id = create_jane(&server).await;

    let response = server
        .patch(&format!("/api/v1/candidates/{id}"))
        .json(&json!({ "customFields": {} }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["data"].get("customFields").is_none());

    let response = server.get(&format!("/api/v1/candidates/{id}")).await;
    let candidate = response.json::<Value>()["data"].clone();
    assert!(candidate.get("customFields").is_none());
    assert_eq!(candidate["name"], "Jane Doe");

    let response = server.get(&format!("/api/v1/candidates/{id}/emails/client")).await;
    response.assert_status_ok();
    let html = response.json::<Value>()["data"]["html"].as_str().unwrap().to_string();
    assert!(!html.contains("Visa Status"));
    assert!(!html.contains("H1B"));
}

#[tokio::test]
async fn delete_removes_candidate_and_matrix() {
    let server = test_server(RecordingMailer::default());
    let id = create_jane(&server).await;

    let response = server.delete(&format!("/api/v1/candidates/{id}")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["id"], json!(id));

    server.get(&format!("/api/v1/candidates/{id}")).await.assert_status_not_found();
    server.get(&format!("/api/v1/candidates/{id}/visibility")).await.assert_status_not_found();
    server.delete(&format!("/api/v1/candidates/{id}")).await.assert_status_not_found();
}

#[tokio::test]
async fn toggle_and_bulk_edit_one_class() {
    let server = test_server(RecordingMailer::default());
    let id = create_jane(&server).await;

    let response = server
        .post(&format!("/api/v1/candidates/{id}/visibility/toggle"))
        .json(&json!({ "field": "expectedSalary", "recipient": "client" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"]["expectedSalary"],
        json!({ "client": false, "internal": true, "superiors": true })
    );

    let response = server
        .post(&format!("/api/v1/candidates/{id}/visibility/bulk"))
        .json(&json!({ "recipient": "superiors", "visible": false }))
        .await;
    response.assert_status_ok();
    let matrix = response.json::<Value>()["data"].clone();
    for toggle in matrix.as_object().unwrap().values() {
        assert_eq!(toggle["superiors"], json!(false));
    }
    assert_eq!(matrix["name"]["client"], json!(true));

    let response = server
        .post(&format!("/api/v1/candidates/{id}/visibility/toggle"))
        .json(&json!({ "field": "favouriteColour", "recipient": "client" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post(&format!("/api/v1/candidates/{id}/visibility/bulk"))
        .json(&json!({ "recipient": "board", "visible": true }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_visibility_hides_missing_fields() {
    let server = test_server(RecordingMailer::default());
    let id = create_jane(&server).await;

    let response = server
        .put(&format!("/api/v1/candidates/{id}/visibility"))
        .json(&json!({ "name": { "client": true, "internal": false, "superiors": false } }))
        .await;
    response.assert_status_ok();

    let response = server.get(&format!("/api/v1/candidates/{id}/emails/client")).await;
    response.assert_status_ok();
    let html = response.json::<Value>()["data"]["html"].as_str().unwrap().to_string();
    assert!(html.contains(">Name<"));
    assert!(!html.contains(">Email<"));
    assert!(!html.contains("Visa Status"));
}

#[tokio::test]
async fn preview_follows_the_matrix_per_class() {
    let server = test_server(RecordingMailer::default());
    let id = create_jane(&server).await;

    let response = server
        .post(&format!("/api/v1/candidates/{id}/visibility/toggle"))
        .json(&json!({ "field": "expectedSalary", "recipient": "client" }))
        .await;
    response.assert_status_ok();

    let response = server.get(&format!("/api/v1/candidates/{id}/emails")).await;
    response.assert_status_ok();
    let emails = response.json::<Value>()["data"].clone();
    let emails = emails.as_array().unwrap();
    assert_eq!(emails.len(), 3);

    assert_eq!(emails[0]["recipient"], "client");
    assert_eq!(emails[0]["subject"], "Candidate Profile: Jane Doe - Acme");
    assert!(!emails[0]["html"].as_str().unwrap().contains("120k"));

    assert_eq!(emails[1]["recipient"], "internal");
    assert_eq!(emails[1]["subject"], "Internal Review: Jane Doe - Go, Rust, SQL");
    assert!(emails[1]["html"].as_str().unwrap().contains("120k"));

    assert_eq!(emails[2]["subject"], "Candidate Assessment: Jane Doe - Berlin");

    let response = server.get(&format!("/api/v1/candidates/{id}/emails/Internal")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], emails[1]);

    server
        .get(&format!("/api/v1/candidates/{id}/emails/board"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server.get("/api/v1/candidates/missing/emails/client").await.assert_status_not_found();
}

#[tokio::test]
async fn send_hands_generated_email_to_mailer() {
    let mailer = RecordingMailer::default();
    let server = test_server(mailer.clone());
    let id = create_jane(&server).await;

    let response = server
        .post(&format!("/api/v1/candidates/{id}/emails/internal/send"))
        .json(&json!({
            "to": "lead@example.com, cto@example.com",
            "cc": " hr@example.com ",
            "bcc": "",
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>()["data"].clone();
    assert_eq!(body["to"], json!(["lead@example.com", "cto@example.com"]));
    assert_eq!(body["cc"], json!(["hr@example.com"]));
    assert_eq!(body["bcc"], json!([]));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let Notification::HtmlEmail { to, subject, html, .. } = &sent[0];
    assert_eq!(to.len(), 2);
    assert_eq!(subject, "Internal Review: Jane Doe - Go, Rust, SQL");
    assert!(html.contains("Please find below the details for Jane Doe:"));

    let response = server
        .post(&format!("/api/v1/candidates/{id}/emails/client/send"))
        .json(&json!({ "to": "client@example.com", "subject": "Strong backend profile" }))
        .await;
    response.assert_status_ok();
    let Notification::HtmlEmail { subject, .. } = &mailer.sent()[1];
    assert_eq!(subject, "Strong backend profile");
}

#[tokio::test]
async fn send_rejects_malformed_addresses_without_sending() {
    let mailer = RecordingMailer::default();
    let server = test_server(mailer.clone());
    let id = create_jane(&server).await;

    let response = server
        .post(&format!("/api/v1/candidates/{id}/emails/client/send"))
        .json(&json!({ "to": "client@example.com", "cc": "not-an-email, ok@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["invalidAddresses"], json!(["not-an-email"]));

    let response = server
        .post(&format!("/api/v1/candidates/{id}/emails/client/send"))
        .json(&json!({ "to": " , " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn send_maps_provider_failures() {
    let server = test_server(RecordingMailer::failing(403));
    let id = create_jane(&server).await;

    let response = server
        .post(&format!("/api/v1/candidates/{id}/emails/superiors/send"))
        .json(&json!({ "to": "boss@example.com" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["type"], "FORBIDDEN");
    assert!(body["error"]["message"].as_str().unwrap().contains("domain-wide delegation"));

    let server = test_server(RecordingMailer::failing(500));
    let id = create_jane(&server).await;

    let response = server
        .post(&format!("/api/v1/candidates/{id}/emails/superiors/send"))
        .json(&json!({ "to": "boss@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unknown_route_is_enveloped_not_found() {
    let server = test_server(RecordingMailer::default());

    let response = server.get("/api/v2/nothing").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["type"], "NOT_FOUND");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_of_one_candidate_are_all_kept() {
    let service = CandidateService::new(
        Arc::new(MemoryRecordStore::new()),
        Arc::new(RecordingMailer::default()),
        RelayMetrics::new().unwrap(),
    );
    let candidate = service
        .create(NewCandidate {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            ..NewCandidate::default()
        })
        .await
        .unwrap();
    let fields = &CandidateField::ALL[..10];

    for round in 1..=3 {
        let tasks = fields
            .iter()
            .map(|&field| {
                let service = service.clone();
                let id = candidate.id.clone();
                tokio::spawn(async move {
                    service.toggle_visibility(&id, field, RecipientClass::Client).await
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            let _matrix = task.await.unwrap().unwrap();
        }

        let matrix = service.visibility(&candidate.id).await.unwrap();
        for &field in fields {
            assert_eq!(matrix.is_visible(field, RecipientClass::Client), round % 2 == 0);
            assert!(matrix.is_visible(field, RecipientClass::Internal));
        }
    }
}
