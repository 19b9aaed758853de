//! Admin database diagnostics endpoints
//!
//! GET reports backend info, a MySQL readiness flag, and configuration
//! recommendations. POST applies the driver's tuning statements and then
//! reports the same shape. Both sit behind the auth middleware.

use axum::{extract::State, Json};
use kana_common::db::diagnostics::{self, DatabaseInfo};
use serde::Serialize;

use crate::AppState;

/// GET /admin/database response body
#[derive(Debug, Serialize)]
pub struct DatabaseInfoResponse {
    pub database_info: DatabaseInfo,
    pub mysql_ready: bool,
    pub recommendations: Vec<Recommendation>,
}

/// POST /admin/database response body
#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: String,
    pub database_info: DatabaseInfo,
}

/// One configuration recommendation
#[derive(Debug, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Warning,
    Error,
    Success,
}

/// GET /admin/database
pub async fn get_database_info(State(state): State<AppState>) -> Json<DatabaseInfoResponse> {
    let info = diagnostics::database_info(&state.db).await;

    Json(DatabaseInfoResponse {
        mysql_ready: check_mysql_ready(&info),
        recommendations: build_recommendations(&info),
        database_info: info,
    })
}

/// POST /admin/database
pub async fn apply_database_optimizations(State(state): State<AppState>) -> Json<ApplyResponse> {
    diagnostics::apply_optimizations(&state.db).await;

    Json(ApplyResponse {
        message: "Database optimizations applied".to_string(),
        database_info: diagnostics::database_info(&state.db).await,
    })
}

/// Readiness: MySQL backend, probe passed, database charset is utf8mb4
fn check_mysql_ready(info: &DatabaseInfo) -> bool {
    info.driver == "mysql"
        && info.japanese_support
        && info.charset.as_deref() == Some("utf8mb4")
}

fn build_recommendations(info: &DatabaseInfo) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if info.driver != "mysql" {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            message: format!(
                "Database driver is not MySQL. Current driver: {}",
                info.driver
            ),
            action: "Set database_url to a mysql:// URL".to_string(),
        });
    }

    if let Some(charset) = &info.charset {
        if charset != "utf8mb4" {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Error,
                message: format!("Database charset is not utf8mb4. Current: {}", charset),
                action: "Convert the database and tables to utf8mb4".to_string(),
            });
        }
    }

    if let Some(collation) = &info.collation {
        if collation != "utf8mb4_unicode_ci" {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Warning,
                message: format!(
                    "Database collation is not utf8mb4_unicode_ci. Current: {}",
                    collation
                ),
                action: "Consider updating collation for better Japanese character sorting"
                    .to_string(),
            });
        }
    }

    if !info.japanese_support {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Error,
            message: "Japanese character support test failed".to_string(),
            action: "Check database charset and collation settings".to_string(),
        });
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            message: "MySQL is properly configured for Japanese characters!".to_string(),
            action: "No action needed".to_string(),
        });
    }

    recommendations
}
