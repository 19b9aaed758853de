//! Database initialization
//!
//! Connects (creating the SQLite file on first run), applies best-effort
//! backend tuning, and creates the `materials` table with its indexes.
//! Idempotent: safe to call on every startup.

use crate::db::{diagnostics, install_drivers, Db, DriverKind};
use crate::Result;
use sqlx::any::AnyPoolOptions;
use std::path::Path;
use tracing::{debug, info};

/// Connect to the database and ensure the schema exists
pub async fn init_database(database_url: &str) -> Result<Db> {
    install_drivers();

    let driver = DriverKind::from_url(database_url);

    // SQLite creates the file itself (mode=rwc) but not its parent directory
    if driver == DriverKind::Sqlite {
        ensure_sqlite_parent_dir(database_url)?;
    }

    let pool = AnyPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("Connected to {} database", driver.as_str());

    let db = Db { pool, driver };

    // Best-effort session tuning; failures degrade to warnings
    diagnostics::apply_optimizations(&db).await;

    create_materials_table(&db).await?;

    Ok(db)
}

fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .split('?')
        .next()
        .unwrap_or("");

    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// Create the materials table
///
/// DDL dispatches on the driver: auto-increment syntax and the JSON column
/// type differ across backends, and MySQL tables must be utf8mb4 for
/// Japanese text to round-trip.
pub async fn create_materials_table(db: &Db) -> Result<()> {
    let ddl = match db.driver {
        DriverKind::MySql => {
            r#"
            CREATE TABLE IF NOT EXISTS materials (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                script_type VARCHAR(191) NOT NULL,
                lesson_key VARCHAR(191) NOT NULL,
                lesson_name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                characters JSON NOT NULL,
                created_at VARCHAR(64) NOT NULL,
                updated_at VARCHAR(64) NOT NULL
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
            "#
        }
        DriverKind::Postgres => {
            r#"
            CREATE TABLE IF NOT EXISTS materials (
                id BIGSERIAL PRIMARY KEY,
                script_type TEXT NOT NULL,
                lesson_key TEXT NOT NULL,
                lesson_name TEXT NOT NULL,
                description TEXT NOT NULL,
                characters JSON NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        }
        _ => {
            r#"
            CREATE TABLE IF NOT EXISTS materials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                script_type TEXT NOT NULL,
                lesson_key TEXT NOT NULL,
                lesson_name TEXT NOT NULL,
                description TEXT NOT NULL,
                characters TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        }
    };

    sqlx::query(ddl).execute(&db.pool).await?;

    // MySQL has no CREATE INDEX IF NOT EXISTS, so re-running init hits
    // duplicate-name errors there; index creation is therefore best-effort.
    let index_statements: &[&str] = match db.driver {
        DriverKind::MySql => &[
            "CREATE INDEX idx_materials_script_type ON materials(script_type)",
            "CREATE INDEX idx_materials_lesson_key ON materials(lesson_key)",
            "CREATE INDEX idx_materials_script_lesson ON materials(script_type, lesson_key)",
        ],
        _ => &[
            "CREATE INDEX IF NOT EXISTS idx_materials_script_type ON materials(script_type)",
            "CREATE INDEX IF NOT EXISTS idx_materials_lesson_key ON materials(lesson_key)",
            "CREATE INDEX IF NOT EXISTS idx_materials_script_lesson ON materials(script_type, lesson_key)",
        ],
    };

    for sql in index_statements {
        if let Err(e) = sqlx::query(sql).execute(&db.pool).await {
            debug!("Index statement not applied: {}", e);
        }
    }

    Ok(())
}
