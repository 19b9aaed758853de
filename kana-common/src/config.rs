//! Configuration loading
//!
//! Every setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use serde::Deserialize;
use std::path::PathBuf;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5780;

/// Environment variable names
pub const ENV_DATABASE_URL: &str = "KANA_DATABASE_URL";
pub const ENV_PORT: &str = "KANA_PORT";
pub const ENV_ADMIN_TOKEN: &str = "KANA_ADMIN_TOKEN";

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database URL (sqlite://, mysql://, postgres://)
    pub database_url: String,
    /// HTTP listen port
    pub port: u16,
    /// Bearer token gating the admin endpoints.
    /// `None` disables admin authentication entirely.
    pub admin_token: Option<String>,
}

/// Command-line overrides, passed through from the binary's clap parser
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub admin_token: Option<String>,
}

/// Optional config file contents (~/.config/kanaflash/config.toml)
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    port: Option<u16>,
    admin_token: Option<String>,
}

/// Resolve the full application configuration
pub fn resolve(cli: CliOverrides) -> AppConfig {
    let file = load_config_file().unwrap_or_default();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var(ENV_DATABASE_URL).ok())
        .or(file.database_url)
        .unwrap_or_else(default_database_url);

    let port = cli
        .port
        .or_else(|| {
            std::env::var(ENV_PORT)
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
        })
        .or(file.port)
        .unwrap_or(DEFAULT_PORT);

    let admin_token = cli
        .admin_token
        .or_else(|| std::env::var(ENV_ADMIN_TOKEN).ok())
        .or(file.admin_token)
        .filter(|t| !t.is_empty());

    AppConfig {
        database_url,
        port,
        admin_token,
    }
}

/// Locate and parse the config file, if one exists
fn load_config_file() -> Option<FileConfig> {
    let path = config_file_path()?;
    let contents = std::fs::read_to_string(path).ok()?;
    toml::from_str(&contents).ok()
}

/// Config file search order: user config dir, then /etc on unix
fn config_file_path() -> Option<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join("kanaflash").join("config.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    #[cfg(unix)]
    {
        let system_config = PathBuf::from("/etc/kanaflash/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Default database: a SQLite file under the OS-local data directory
fn default_database_url() -> String {
    let data_dir = dirs::data_local_dir()
        .map(|d| d.join("kanaflash"))
        .unwrap_or_else(|| PathBuf::from("./kanaflash_data"));

    format!("sqlite://{}?mode=rwc", data_dir.join("kana.db").display())
}
