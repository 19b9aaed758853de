//! HTTP API handlers for kana-web

pub mod auth;
pub mod database;
pub mod health;
pub mod pages;

pub use auth::auth_middleware;
pub use database::{apply_database_optimizations, get_database_info};
pub use health::health_routes;
pub use pages::{flashcard, lesson_list, serve_script_selection, serve_welcome};
