//! Learning page handlers
//!
//! Each page is an HTML shell with its initial state embedded as a JSON
//! `<script>` block, hydrated by inline client code. Handlers validate the
//! script type before touching storage; anything outside
//! {hiragana, katakana} is a plain 404 with no logging.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use kana_common::db::{queries, Material, ScriptType};
use serde::Serialize;
use tracing::error;

use crate::AppState;

const WELCOME_HTML: &str = include_str!("../ui/welcome.html");
const SCRIPT_SELECTION_HTML: &str = include_str!("../ui/script-selection.html");
const LESSON_LIST_HTML: &str = include_str!("../ui/lesson-list.html");
const FLASHCARD_HTML: &str = include_str!("../ui/flashcard.html");

/// GET /
///
/// Static welcome page
pub async fn serve_welcome() -> Html<&'static str> {
    Html(WELCOME_HTML)
}

/// GET /scripts
///
/// Static script-selection page
pub async fn serve_script_selection() -> Html<&'static str> {
    Html(SCRIPT_SELECTION_HTML)
}

#[derive(Debug, Serialize)]
struct LessonListState {
    script_type: ScriptType,
    materials: Vec<Material>,
}

#[derive(Debug, Serialize)]
struct FlashcardState {
    script_type: ScriptType,
    material: Material,
}

/// GET /lessons/:script_type
///
/// Lesson list for one script type; an empty list still renders.
pub async fn lesson_list(
    State(state): State<AppState>,
    Path(script_type): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let script = ScriptType::parse(&script_type).ok_or(StatusCode::NOT_FOUND)?;

    let materials = queries::list_by_script_type(&state.db, script)
        .await
        .map_err(|e| {
            error!("Failed to list lessons for {}: {}", script, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(render(
        LESSON_LIST_HTML,
        &LessonListState {
            script_type: script,
            materials,
        },
    ))
}

/// GET /flashcard/:script_type/:lesson_key
///
/// Flashcard page for one lesson; 404 when the lesson does not exist.
pub async fn flashcard(
    State(state): State<AppState>,
    Path((script_type, lesson_key)): Path<(String, String)>,
) -> Result<Html<String>, StatusCode> {
    let script = ScriptType::parse(&script_type).ok_or(StatusCode::NOT_FOUND)?;

    let material = queries::find_one(&state.db, script, &lesson_key)
        .await
        .map_err(|e| {
            error!("Failed to load flashcard {}/{}: {}", script, lesson_key, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(render(
        FLASHCARD_HTML,
        &FlashcardState {
            script_type: script,
            material,
        },
    ))
}

/// Embed page state into the shell's `__PAGE_DATA__` placeholder.
///
/// `</` is escaped so material text can never terminate the JSON script
/// block early.
fn render<T: Serialize>(template: &str, state: &T) -> Html<String> {
    let json = serde_json::to_string(state)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");

    Html(template.replace("__PAGE_DATA__", &json))
}
