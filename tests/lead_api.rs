mod support;

use axum::http::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use support::{create_document, doc_id, read_json, send_request, setup_test_app};

fn new_lead() -> Value {
    json!({
        "date": "2024-03-15",
        "client": "Test Client",
        "phone": "+1234567890",
        "email": "lead@example.com",
        "budget": 50000,
        "request": "Website redesign",
    })
}

#[tokio::test]
async fn create_lead_with_valid_data() {
    let app = setup_test_app();

    let response =
        send_request(&app, Method::POST, "/api/lead/create", None, Some(new_lead())).await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["result"]["client"], json!("Test Client"));
    assert_eq!(body["result"]["budget"], json!(50000));
    assert_eq!(body["result"]["email"], json!("lead@example.com"));
}

#[tokio::test]
async fn create_lead_each_required_field_is_enforced() {
    let app = setup_test_app();

    for field in ["date", "client", "phone", "email"] {
        let mut lead = new_lead();
        lead.as_object_mut().unwrap().remove(field);
        let response =
            send_request(&app, Method::POST, "/api/lead/create", None, Some(lead)).await;
        assert_eq!(response.status(), 400, "missing {field} should be rejected");
        let body: Value = read_json(response).await;
        assert_eq!(body["message"], json!("Required fields are missing"));
    }
}

#[tokio::test]
async fn create_minimal_lead_defaults_status_to_pending() {
    let app = setup_test_app();

    let response = send_request(
        &app,
        Method::POST,
        "/api/lead/create",
        None,
        Some(json!({
            "date": "2024-03-15",
            "client": "Minimal Client",
            "phone": "555",
            "email": "minimal@example.com",
        })),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["result"]["status"], json!("pending"));
    assert!(body["result"].get("budget").is_none());
}

#[tokio::test]
async fn create_lead_keeps_explicit_status() {
    let app = setup_test_app();

    let mut lead = new_lead();
    lead["status"] = json!("contacted");
    let response = send_request(&app, Method::POST, "/api/lead/create", None, Some(lead)).await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["result"]["status"], json!("contacted"));
}

#[tokio::test]
async fn create_lead_lowercases_email() {
    let app = setup_test_app();

    let mut lead = new_lead();
    lead["email"] = json!("LEAD@EXAMPLE.COM");
    let response = send_request(&app, Method::POST, "/api/lead/create", None, Some(lead)).await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["result"]["email"], json!("lead@example.com"));
}

#[tokio::test]
async fn list_leads_reports_pagination() {
    let app = setup_test_app();
    create_document(&app, "lead", new_lead()).await;

    let response =
        send_request(&app, Method::GET, "/api/lead/list?page=1&items=10", None, None).await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["pagination"]["page"], json!(1));
    assert_eq!(body["pagination"]["count"], json!(1));
}

#[tokio::test]
async fn list_empty_leads_answers_203() {
    let app = setup_test_app();

    let response = send_request(&app, Method::GET, "/api/lead/list", None, None).await;

    assert_eq!(response.status(), 203);
}

#[tokio::test]
async fn read_lead_round_trip() {
    let app = setup_test_app();
    let created = create_document(&app, "lead", new_lead()).await;
    let id = doc_id(&created);

    let response =
        send_request(&app, Method::GET, &format!("/api/lead/read/{id}"), None, None).await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["result"]["client"], json!("Test Client"));
    assert_eq!(body["result"]["request"], json!("Website redesign"));
}

#[tokio::test]
async fn read_nonexistent_lead_is_404() {
    let app = setup_test_app();

    let response = send_request(
        &app,
        Method::GET,
        &format!("/api/lead/read/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn update_lead_budget_and_client() {
    let app = setup_test_app();
    let created = create_document(&app, "lead", new_lead()).await;
    let id = doc_id(&created);

    let response = send_request(
        &app,
        Method::PATCH,
        &format!("/api/lead/update/{id}"),
        None,
        Some(json!({ "budget": 60000, "client": "Updated Client Name" })),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert_eq!(body["result"]["budget"], json!(60000));
    assert_eq!(body["result"]["client"], json!("Updated Client Name"));
    assert_eq!(body["result"]["status"], json!("pending"));
}

#[tokio::test]
async fn update_nonexistent_lead_is_404() {
    let app = setup_test_app();

    let response = send_request(
        &app,
        Method::PATCH,
        &format!("/api/lead/update/{}", Uuid::new_v4()),
        None,
        Some(json!({ "budget": 1 })),
    )
    .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn delete_lead_then_read_is_404() {
    let app = setup_test_app();
    let created = create_document(&app, "lead", new_lead()).await;
    let id = doc_id(&created);

    let response = send_request(
        &app,
        Method::DELETE,
        &format!("/api/lead/delete/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), 200);

    let response =
        send_request(&app, Method::GET, &format!("/api/lead/read/{id}"), None, None).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn search_leads_by_client_name() {
    let app = setup_test_app();
    create_document(&app, "lead", new_lead()).await;

    let response = send_request(
        &app,
        Method::GET,
        "/api/lead/search?q=Test%20Client&fields=client",
        None,
        None,
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: Value = read_json(response).await;
    assert!(body["result"][0]["client"]
        .as_str()
        .unwrap()
        .contains("Test Client"));
}

#[tokio::test]
async fn search_leads_empty_query_answers_202() {
    let app = setup_test_app();
    create_document(&app, "lead", new_lead()).await;

    let response =
        send_request(&app, Method::GET, "/api/lead/search?q=&fields=client", None, None).await;

    assert_eq!(response.status(), 202);
}
