//! Backend diagnostics
//!
//! Three independent, best-effort operations used by the admin endpoint
//! and at startup:
//! - fixed per-driver tuning statements (warn-and-continue on failure)
//! - a multi-byte text round-trip probe (any failure collapses to `false`)
//! - backend introspection (failures captured in an `error` field)

use crate::db::{rebind, Db, DriverKind};
use crate::Result;
use rand::Rng;
use serde::Serialize;
use tracing::{error, info, warn};

/// Known multi-byte test string for the round-trip probe
pub const PROBE_TEXT: &str = "あいうえお";

/// Backend information reported by the admin endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub driver: String,
    pub japanese_support: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fixed session-tuning statement list for a driver
pub fn tuning_statements(driver: DriverKind) -> &'static [&'static str] {
    match driver {
        DriverKind::MySql => &[
            // utf8mb4 so Japanese text survives the session
            "SET NAMES utf8mb4 COLLATE utf8mb4_unicode_ci",
            "SET sql_mode = ''",
            "SET optimizer_search_depth = 62",
        ],
        DriverKind::Postgres => &[
            "SET TIME ZONE 'UTC'",
            "SET enable_hashjoin = on",
            "SET enable_mergejoin = on",
        ],
        DriverKind::Sqlite => &[
            "PRAGMA foreign_keys = ON",
            "PRAGMA journal_mode = WAL",
            "PRAGMA synchronous = NORMAL",
            "PRAGMA cache_size = 1000000",
        ],
        DriverKind::Other => &[],
    }
}

/// Apply the driver's tuning statements. Never fails past this boundary.
pub async fn apply_optimizations(db: &Db) {
    let statements = tuning_statements(db.driver);
    if statements.is_empty() {
        info!("No specific optimizations for driver: {}", db.driver.as_str());
        return;
    }
    apply_statements(db, statements, db.driver.as_str()).await;
}

/// Run a statement list, warn-and-continue on each failure
pub async fn apply_statements(db: &Db, statements: &[&str], label: &str) {
    let mut failures = 0;

    for sql in statements {
        if let Err(e) = sqlx::query(sql).execute(&db.pool).await {
            warn!("Failed to apply {} optimization `{}`: {}", label, sql, e);
            failures += 1;
        }
    }

    if failures == 0 {
        info!("{} optimizations applied successfully", label);
    }
}

/// Round-trip PROBE_TEXT through a throwaway table.
///
/// Returns whether the text came back byte-identical; any error along the
/// way is logged and collapses the result to `false`. The random suffix is
/// not collision-guarded; concurrent self-runs are an accepted limitation.
pub async fn probe_multibyte_text(db: &Db) -> bool {
    let table = format!("probe_jp_{}", rand::thread_rng().gen_range(1000..10000));

    match run_probe(db, &table).await {
        Ok(preserved) => preserved,
        Err(e) => {
            error!("Multi-byte text probe failed: {}", e);
            false
        }
    }
}

async fn run_probe(db: &Db, table: &str) -> Result<bool> {
    sqlx::query(&format!("CREATE TABLE {} (id INTEGER, content TEXT)", table))
        .execute(&db.pool)
        .await?;

    let insert = rebind(
        &format!("INSERT INTO {} (id, content) VALUES (?, ?)", table),
        db.driver,
    );
    sqlx::query(&insert)
        .bind(1i64)
        .bind(PROBE_TEXT)
        .execute(&db.pool)
        .await?;

    let select = rebind(&format!("SELECT content FROM {} WHERE id = ?", table), db.driver);
    let stored: String = sqlx::query_scalar(&select)
        .bind(1i64)
        .fetch_one(&db.pool)
        .await?;

    sqlx::query(&format!("DROP TABLE {}", table))
        .execute(&db.pool)
        .await?;

    Ok(stored == PROBE_TEXT)
}

/// Collect backend information for the admin endpoint.
///
/// Introspection failure never propagates; it lands in `info.error`.
pub async fn database_info(db: &Db) -> DatabaseInfo {
    let mut info = DatabaseInfo {
        driver: db.driver.as_str().to_string(),
        japanese_support: probe_multibyte_text(db).await,
        version: None,
        charset: None,
        collation: None,
        encoding: None,
        error: None,
    };

    if let Err(e) = fill_backend_details(db, &mut info).await {
        info.error = Some(e.to_string());
    }

    info
}

async fn fill_backend_details(db: &Db, info: &mut DatabaseInfo) -> Result<()> {
    match db.driver {
        DriverKind::MySql => {
            info.version = Some(fetch_scalar(db, "SELECT VERSION()").await?);
            info.charset = Some(
                fetch_optional_scalar(db, "SELECT @@character_set_database")
                    .await?
                    .unwrap_or_else(|| "unknown".to_string()),
            );
            info.collation = Some(
                fetch_optional_scalar(db, "SELECT @@collation_database")
                    .await?
                    .unwrap_or_else(|| "unknown".to_string()),
            );
        }
        DriverKind::Postgres => {
            info.version = Some(fetch_scalar(db, "SELECT VERSION()").await?);
            info.encoding = Some(
                fetch_optional_scalar(db, "SHOW client_encoding")
                    .await?
                    .unwrap_or_else(|| "unknown".to_string()),
            );
        }
        DriverKind::Sqlite => {
            info.version = Some(fetch_scalar(db, "SELECT sqlite_version()").await?);
        }
        DriverKind::Other => {}
    }

    Ok(())
}

async fn fetch_scalar(db: &Db, sql: &str) -> Result<String> {
    Ok(sqlx::query_scalar(sql).fetch_one(&db.pool).await?)
}

async fn fetch_optional_scalar(db: &Db, sql: &str) -> Result<Option<String>> {
    Ok(sqlx::query_scalar(sql).fetch_one(&db.pool).await?)
}
