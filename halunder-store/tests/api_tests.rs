//! Integration tests for halunder-store API endpoints
//!
//! Tests cover:
//! - Health and status endpoints
//! - User list
//! - Ingest of processing-engine output followed by full retrieval
//! - Partial update and delete of single sentence pairs
//! - CSV export (parallel pairs only, attachment filename, BOM)

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use halunder_common::models::{NewSentence, NewText};
use halunder_store::{build_router, db, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: fresh in-memory store with two operators
async fn setup_app() -> Router {
    let pool = db::init_in_memory().await.expect("Should open in-memory database");
    db::users::ensure_users(&pool, &["Julius".to_string(), "Jakob".to_string()])
        .await
        .expect("Should seed users");
    build_router(AppState::new(pool))
}

fn sample_text() -> NewText {
    NewText {
        content: "Moin. Wat maakst du? Ik gung noa Lun.".to_string(),
        language: "halunder".to_string(),
        text_type: Some("parallel".to_string()),
        source_title: Some("Helgoländer Gespräche".to_string()),
        added_by: "Jakob".to_string(),
        sentences: vec![
            NewSentence {
                halunder_text: Some("Moin.".to_string()),
                german_text: Some("Hallo.".to_string()),
                match_confidence: Some(0.95),
                reasoning: Some("greeting".to_string()),
                ..Default::default()
            },
            NewSentence {
                halunder_text: Some("Wat maakst du?".to_string()),
                german_text: Some("Was machst du?".to_string()),
                match_confidence: Some(0.6),
                ..Default::default()
            },
            NewSentence {
                halunder_text: Some("Ik gung noa Lun.".to_string()),
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Ingest the sample text and return the listed sentences
async fn seed(app: &Router) -> Vec<Value> {
    let body = serde_json::to_value(sample_text()).unwrap();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/texts", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/all-sentences"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["sentences"].as_array().unwrap().clone()
}

// =============================================================================
// Health / Status / Users
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "halunder-store");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(empty_request("GET", "/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "Halunder Corpus API Running");
}

#[tokio::test]
async fn test_users_sorted() {
    let app = setup_app().await;

    let response = app.oneshot(empty_request("GET", "/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["users"], json!(["Jakob", "Julius"]));
}

// =============================================================================
// Ingest + Retrieval
// =============================================================================

#[tokio::test]
async fn test_ingest_then_retrieve_all() {
    let app = setup_app().await;
    let sentences = seed(&app).await;

    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[0]["halunder_text"], "Moin.");
    assert_eq!(sentences[0]["source_title"], "Helgoländer Gespräche");
    assert_eq!(sentences[0]["reasoning"], "greeting");
    assert_eq!(sentences[2]["german_text"], "");
    assert!(sentences[2]["match_confidence"].is_null());

    let ids: std::collections::HashSet<_> =
        sentences.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 3, "ids must be unique");
}

#[tokio::test]
async fn test_ingest_requires_operator() {
    let app = setup_app().await;
    let mut text = sample_text();
    text.added_by = String::new();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/texts",
            serde_json::to_value(text).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Partial Update / Delete
// =============================================================================

#[tokio::test]
async fn test_partial_update() {
    let app = setup_app().await;
    let sentences = seed(&app).await;
    let id = sentences[2]["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/sentences/{}", id),
            json!({
                "german_text": "Ich ging nach Land.",
                "match_confidence": 0.75,
                "unrelated": "ignored",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["updated"]["german_text"], "Ich ging nach Land.");
    assert_eq!(body["updated"]["halunder_text"], "Ik gung noa Lun.");
    assert_eq!(body["updated"]["match_confidence"], 0.75);
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/sentences/does-not-exist",
            json!({"reasoning": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_rejects_out_of_range_confidence() {
    let app = setup_app().await;
    let sentences = seed(&app).await;
    let id = sentences[0]["id"].as_str().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/sentences/{}", id),
            json!({"match_confidence": 75}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_sentence() {
    let app = setup_app().await;
    let sentences = seed(&app).await;
    let uri = format!("/api/sentences/{}", sentences[1]["id"].as_str().unwrap());

    let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// CSV Export
// =============================================================================

#[tokio::test]
async fn test_export_parallel_pairs_as_attachment() {
    let app = setup_app().await;
    seed(&app).await;

    let response = app.oneshot(empty_request("GET", "/api/export")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=halunder_parallel_corpus_"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    // header + two parallel pairs; the Halunder-only sentence is left out
    assert_eq!(text.lines().count(), 3);
    assert!(!text.contains("Ik gung noa Lun."));
}
