//! # KanaFlash Common Library
//!
//! Shared code for the KanaFlash flashcard application:
//! - Database layer (connection, schema, models, queries, seed data)
//! - Backend diagnostics (tuning statements, multi-byte probe, introspection)
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
