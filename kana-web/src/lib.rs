//! kana-web library - KanaFlash HTTP server
//!
//! Serves the flashcard learning pages, the health check, and the
//! admin-gated database diagnostics endpoints.

use axum::Router;
use kana_common::db::Db;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database handle (read-only usage at runtime)
    pub db: Db,
    /// Bearer token for the admin endpoints; `None` disables auth
    pub admin_token: Option<String>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: Db, admin_token: Option<String>) -> Self {
        Self { db, admin_token }
    }
}

/// Build application router
///
/// Admin routes sit behind the auth middleware; everything else is public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    // Admin routes (require authentication when a token is configured)
    let admin = Router::new()
        .route(
            "/admin/database",
            get(api::get_database_info).post(api::apply_database_optimizations),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/", get(api::serve_welcome))
        .route("/scripts", get(api::serve_script_selection))
        .route("/lessons/:script_type", get(api::lesson_list))
        .route("/flashcard/:script_type/:lesson_key", get(api::flashcard))
        .merge(api::health_routes());

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
