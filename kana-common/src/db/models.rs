//! Database models

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Japanese syllabary covered by a lesson.
///
/// The closed application domain. Anything else in storage (the legacy
/// `mixed` value included) fails to parse and is surfaced as an error
/// rather than silently supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Hiragana,
    Katakana,
}

impl ScriptType {
    /// Parse a script type, returning `None` for anything outside the domain
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hiragana" => Some(ScriptType::Hiragana),
            "katakana" => Some(ScriptType::Katakana),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::Hiragana => "hiragana",
            ScriptType::Katakana => "katakana",
        }
    }
}

impl FromStr for ScriptType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidInput(format!("unknown script type: {}", s)))
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One learnable grapheme: the character, its romanization, and a
/// pronunciation hint. Extra fields in stored JSON are tolerated on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub jp: String,
    pub romaji: String,
    pub sound: String,
}

/// A lesson material row
#[derive(Debug, Clone, Serialize)]
pub struct Material {
    pub id: i64,
    pub script_type: ScriptType,
    pub lesson_key: String,
    pub lesson_name: String,
    pub description: String,
    pub characters: Vec<CharacterEntry>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Material fields for insertion (seeder only; the running app never writes)
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub script_type: ScriptType,
    pub lesson_key: String,
    pub lesson_name: String,
    pub description: String,
    pub characters: Vec<CharacterEntry>,
}

impl Material {
    /// Decode a row fetched through the Any driver.
    ///
    /// The `characters` column arrives as JSON text; timestamps as RFC 3339
    /// text. A malformed row is a data error, not a panic.
    pub fn from_any_row(row: &AnyRow) -> Result<Self> {
        let script_raw: String = row.try_get("script_type")?;
        let script_type = ScriptType::parse(&script_raw)
            .ok_or_else(|| Error::Data(format!("unknown script type in storage: {}", script_raw)))?;

        let characters_json: String = row.try_get("characters")?;
        let characters: Vec<CharacterEntry> = serde_json::from_str(&characters_json)
            .map_err(|e| Error::Data(format!("malformed characters JSON: {}", e)))?;

        Ok(Material {
            id: row.try_get("id")?,
            script_type,
            lesson_key: row.try_get("lesson_key")?,
            lesson_name: row.try_get("lesson_name")?,
            description: row.try_get("description")?,
            characters,
            created_at: parse_timestamp(row.try_get::<String, _>("created_at").ok()),
            updated_at: parse_timestamp(row.try_get::<String, _>("updated_at").ok()),
        })
    }
}

/// Timestamps are informational only; unparseable values decode to `None`
fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
