//! Content queries over the materials table
//!
//! The running application is read-only: `insert_material` exists for the
//! seeder alone.

use crate::db::{rebind, Db, DriverKind, Material, NewMaterial, ScriptType};
use crate::{Error, Result};
use chrono::Utc;

/// Column list for SELECTs.
///
/// The `characters` column is JSON-typed on MySQL/PostgreSQL; casting to
/// text keeps decoding uniform across drivers.
fn select_columns(driver: DriverKind) -> String {
    let characters = match driver {
        DriverKind::MySql => "CAST(characters AS CHAR)",
        DriverKind::Postgres => "characters::text",
        _ => "characters",
    };

    format!(
        "id, script_type, lesson_key, lesson_name, description, \
         {} AS characters, created_at, updated_at",
        characters
    )
}

/// All materials for a script type, ordered by lesson key ascending.
/// An empty result set is `Ok(vec![])`, not an error.
pub async fn list_by_script_type(db: &Db, script: ScriptType) -> Result<Vec<Material>> {
    let sql = rebind(
        &format!(
            "SELECT {} FROM materials WHERE script_type = ? ORDER BY lesson_key ASC",
            select_columns(db.driver)
        ),
        db.driver,
    );

    let rows = sqlx::query(&sql)
        .bind(script.as_str())
        .fetch_all(&db.pool)
        .await?;

    rows.iter().map(Material::from_any_row).collect()
}

/// Exact match on `(script_type, lesson_key)`; absence is `Ok(None)`
pub async fn find_one(db: &Db, script: ScriptType, lesson_key: &str) -> Result<Option<Material>> {
    let sql = rebind(
        &format!(
            "SELECT {} FROM materials WHERE script_type = ? AND lesson_key = ?",
            select_columns(db.driver)
        ),
        db.driver,
    );

    let row = sqlx::query(&sql)
        .bind(script.as_str())
        .bind(lesson_key)
        .fetch_optional(&db.pool)
        .await?;

    row.as_ref().map(Material::from_any_row).transpose()
}

/// Whether a `(script_type, lesson_key)` pair is already present
pub async fn exists(db: &Db, script: ScriptType, lesson_key: &str) -> Result<bool> {
    let sql = rebind(
        "SELECT COUNT(*) FROM materials WHERE script_type = ? AND lesson_key = ?",
        db.driver,
    );

    let count: i64 = sqlx::query_scalar(&sql)
        .bind(script.as_str())
        .bind(lesson_key)
        .fetch_one(&db.pool)
        .await?;

    Ok(count > 0)
}

/// Insert one material (seeder only)
pub async fn insert_material(db: &Db, material: &NewMaterial) -> Result<()> {
    let characters = serde_json::to_string(&material.characters)
        .map_err(|e| Error::Data(format!("failed to encode characters: {}", e)))?;
    let now = Utc::now().to_rfc3339();

    // PostgreSQL needs an explicit cast when binding text into a JSON column
    let characters_value = match db.driver {
        DriverKind::Postgres => "CAST(? AS JSON)",
        _ => "?",
    };

    let sql = rebind(
        &format!(
            "INSERT INTO materials \
             (script_type, lesson_key, lesson_name, description, characters, created_at, updated_at) \
             VALUES (?, ?, ?, ?, {}, ?, ?)",
            characters_value
        ),
        db.driver,
    );

    sqlx::query(&sql)
        .bind(material.script_type.as_str())
        .bind(&material.lesson_key)
        .bind(&material.lesson_name)
        .bind(&material.description)
        .bind(&characters)
        .bind(&now)
        .bind(&now)
        .execute(&db.pool)
        .await?;

    Ok(())
}
