//! Database access layer for KanaFlash
//!
//! Built on the sqlx `Any` driver so the same code runs against SQLite,
//! MySQL, and PostgreSQL. Driver-specific behavior (schema DDL, tuning
//! statements, introspection) dispatches on [`DriverKind`].

use sqlx::AnyPool;
use std::sync::Once;

pub mod diagnostics;
pub mod init;
pub mod models;
pub mod queries;
pub mod seed;

pub use init::init_database;
pub use models::{CharacterEntry, Material, NewMaterial, ScriptType};

/// Database backend kind, derived from the connection URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    MySql,
    Postgres,
    Sqlite,
    Other,
}

impl DriverKind {
    /// Classify a database URL by its scheme
    pub fn from_url(url: &str) -> Self {
        let scheme = url.split(':').next().unwrap_or("");
        match scheme {
            "mysql" | "mariadb" => DriverKind::MySql,
            "postgres" | "postgresql" => DriverKind::Postgres,
            "sqlite" => DriverKind::Sqlite,
            _ => DriverKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverKind::MySql => "mysql",
            DriverKind::Postgres => "postgres",
            DriverKind::Sqlite => "sqlite",
            DriverKind::Other => "other",
        }
    }
}

/// Connection handle: pool plus the driver kind it was opened with
#[derive(Debug, Clone)]
pub struct Db {
    pub pool: AnyPool,
    pub driver: DriverKind,
}

impl Db {
    /// Connect and initialize the schema. See [`init::init_database`].
    pub async fn connect(database_url: &str) -> crate::Result<Self> {
        init::init_database(database_url).await
    }
}

/// Register the compiled-in sqlx Any drivers. Idempotent.
pub fn install_drivers() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(sqlx::any::install_default_drivers);
}

/// Rewrite `?` placeholders to `$n` for PostgreSQL.
///
/// Only safe for statements that contain no literal `?`; every query in this
/// crate satisfies that.
pub fn rebind(sql: &str, driver: DriverKind) -> String {
    if driver != DriverKind::Postgres {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0;
    for c in sql.chars() {
        if c == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(c);
        }
    }
    out
}
