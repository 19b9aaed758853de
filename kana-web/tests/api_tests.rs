//! Integration tests for the kana-web HTTP API
//!
//! Tests cover:
//! - Page routes and their 404 behavior for invalid script types
//! - Embedded page state (lesson lists, flashcard character order)
//! - Health endpoint
//! - Admin database endpoints and bearer-token authentication

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use kana_common::db::{queries, seed, CharacterEntry, Db, NewMaterial, ScriptType};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method
use kana_web::{build_router, AppState};

/// Test helper: fresh SQLite database in a temp directory
async fn setup_db() -> (TempDir, Db) {
    let dir = TempDir::new().expect("Should create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("kana.db").display());
    let db = Db::connect(&url).await.expect("Should initialize database");
    (dir, db)
}

/// Test helper: app with admin auth disabled
fn setup_app(db: Db) -> axum::Router {
    build_router(AppState::new(db, None))
}

/// Test helper: app with admin auth enabled
fn setup_app_with_auth(db: Db, token: &str) -> axum::Router {
    build_router(AppState::new(db, Some(token.to_string())))
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn test_request_with_bearer(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn extract_body(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

async fn extract_json(body: Body) -> Value {
    let text = extract_body(body).await;
    serde_json::from_str(&text).expect("Should parse JSON")
}

/// Pull the embedded initial-state JSON out of a rendered page
fn extract_page_data(html: &str) -> Value {
    let marker = "<script id=\"page-data\" type=\"application/json\">";
    let start = html.find(marker).expect("Page should embed state") + marker.len();
    let end = html[start..]
        .find("</script>")
        .expect("State block should terminate")
        + start;
    serde_json::from_str(&html[start..end]).expect("Embedded state should parse")
}

fn vowels_material() -> NewMaterial {
    NewMaterial {
        script_type: ScriptType::Hiragana,
        lesson_key: "vowels".to_string(),
        lesson_name: "Vokal (A, I, U, E, O)".to_string(),
        description: "Pelajari 5 huruf vokal dasar dalam hiragana".to_string(),
        characters: [
            ("あ", "a", "ah"),
            ("い", "i", "ee"),
            ("う", "u", "oo"),
            ("え", "e", "eh"),
            ("お", "o", "oh"),
        ]
        .iter()
        .map(|&(jp, romaji, sound)| CharacterEntry {
            jp: jp.to_string(),
            romaji: romaji.to_string(),
            sound: sound.to_string(),
        })
        .collect(),
    }
}

// =============================================================================
// Static pages
// =============================================================================

#[tokio::test]
async fn test_welcome_page() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    let response = app.oneshot(test_request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_body(response.into_body()).await;
    assert!(html.contains("KanaFlash"));
    assert!(html.contains("/scripts"));
}

#[tokio::test]
async fn test_script_selection_page() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    let response = app.oneshot(test_request("GET", "/scripts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_body(response.into_body()).await;
    assert!(html.contains("/lessons/hiragana"));
    assert!(html.contains("/lessons/katakana"));
}

// =============================================================================
// Script type validation (404s, storage untouched)
// =============================================================================

#[tokio::test]
async fn test_invalid_script_type_is_404() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    for uri in [
        "/lessons/mixed",
        "/lessons/kanji",
        "/lessons/HIRAGANA",
        "/flashcard/mixed/vowels",
        "/flashcard/romaji/vowels",
    ] {
        let response = app
            .clone()
            .oneshot(test_request("GET", uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
    }
}

// =============================================================================
// Lesson list page
// =============================================================================

#[tokio::test]
async fn test_lesson_list_embeds_seeded_record() {
    let (_dir, db) = setup_db().await;
    queries::insert_material(&db, &vowels_material())
        .await
        .unwrap();
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/lessons/hiragana"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_body(response.into_body()).await;
    let data = extract_page_data(&html);

    assert_eq!(data["script_type"], "hiragana");
    let materials = data["materials"].as_array().unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0]["lesson_key"], "vowels");
    assert_eq!(materials[0]["lesson_name"], "Vokal (A, I, U, E, O)");
}

#[tokio::test]
async fn test_lesson_list_empty_is_still_200() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/lessons/katakana"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_body(response.into_body()).await;
    let data = extract_page_data(&html);
    assert_eq!(data["materials"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_lesson_list_ordered_by_lesson_key() {
    let (_dir, db) = setup_db().await;
    seed::seed_materials(&db).await.unwrap();
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/lessons/hiragana"))
        .await
        .unwrap();
    let html = extract_body(response.into_body()).await;
    let data = extract_page_data(&html);

    let keys: Vec<&str> = data["materials"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["lesson_key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["k-series", "s-series", "t-series", "vowels"]);
}

// =============================================================================
// Flashcard page
// =============================================================================

#[tokio::test]
async fn test_flashcard_preserves_character_order() {
    let (_dir, db) = setup_db().await;
    queries::insert_material(&db, &vowels_material())
        .await
        .unwrap();
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/flashcard/hiragana/vowels"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_body(response.into_body()).await;
    let data = extract_page_data(&html);

    let jp: Vec<&str> = data["material"]["characters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["jp"].as_str().unwrap())
        .collect();
    assert_eq!(jp, vec!["あ", "い", "う", "え", "お"]);
}

#[tokio::test]
async fn test_flashcard_missing_lesson_is_404() {
    let (_dir, db) = setup_db().await;
    queries::insert_material(&db, &vowels_material())
        .await
        .unwrap();
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/flashcard/hiragana/nonexistent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_flashcard_wrong_script_for_existing_key_is_404() {
    let (_dir, db) = setup_db().await;
    queries::insert_material(&db, &vowels_material())
        .await
        .unwrap();
    let app = setup_app(db);

    // "vowels" exists for hiragana only
    let response = app
        .oneshot(test_request("GET", "/flashcard/katakana/vowels"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/health-check"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

// =============================================================================
// Admin database endpoints
// =============================================================================

#[tokio::test]
async fn test_admin_database_info_shape() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("GET", "/admin/database"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["database_info"]["driver"], "sqlite");
    assert_eq!(body["database_info"]["japanese_support"], true);
    assert!(body["database_info"]["version"].is_string());
    assert_eq!(body["mysql_ready"], false);

    // SQLite backend draws the not-MySQL warning
    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(recommendations
        .iter()
        .any(|r| r["type"] == "warning"
            && r["message"].as_str().unwrap().contains("not MySQL")));
}

#[tokio::test]
async fn test_admin_database_optimize() {
    let (_dir, db) = setup_db().await;
    let app = setup_app(db);

    let response = app
        .oneshot(test_request("POST", "/admin/database"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Database optimizations applied");
    assert_eq!(body["database_info"]["driver"], "sqlite");
}

#[tokio::test]
async fn test_admin_requires_token_when_configured() {
    let (_dir, db) = setup_db().await;
    let app = setup_app_with_auth(db, "correct-horse");

    // No header
    let response = app
        .clone()
        .oneshot(test_request("GET", "/admin/database"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());

    // Wrong token
    let response = app
        .clone()
        .oneshot(test_request_with_bearer(
            "GET",
            "/admin/database",
            "battery-staple",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct token
    let response = app
        .oneshot(test_request_with_bearer(
            "GET",
            "/admin/database",
            "correct-horse",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_does_not_gate_public_routes() {
    let (_dir, db) = setup_db().await;
    let app = setup_app_with_auth(db, "correct-horse");

    for uri in ["/", "/scripts", "/health-check", "/lessons/hiragana"] {
        let response = app
            .clone()
            .oneshot(test_request("GET", uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
    }
}

// =============================================================================
// End-to-end seed scenario
// =============================================================================

#[tokio::test]
async fn test_end_to_end_seeded_flow() {
    let (_dir, db) = setup_db().await;
    queries::insert_material(&db, &vowels_material())
        .await
        .unwrap();
    let app = setup_app(db);

    // List shows exactly the one seeded record
    let response = app
        .clone()
        .oneshot(test_request("GET", "/lessons/hiragana"))
        .await
        .unwrap();
    let data = extract_page_data(&extract_body(response.into_body()).await);
    assert_eq!(data["materials"].as_array().unwrap().len(), 1);

    // Flashcard returns all five characters in original order
    let response = app
        .clone()
        .oneshot(test_request("GET", "/flashcard/hiragana/vowels"))
        .await
        .unwrap();
    let data = extract_page_data(&extract_body(response.into_body()).await);
    assert_eq!(
        data["material"]["characters"].as_array().unwrap().len(),
        5
    );

    // Unknown lesson is a 404
    let response = app
        .oneshot(test_request("GET", "/flashcard/hiragana/nonexistent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
