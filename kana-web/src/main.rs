//! kana-web - KanaFlash flashcard learning server
//!
//! Serves the hiragana/katakana learning pages over a single materials
//! table, plus a health check and admin-gated database diagnostics.

use anyhow::Result;
use clap::Parser;
use kana_common::config::{self, CliOverrides};
use kana_common::db::{seed, Db};
use kana_web::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kana-web", about = "KanaFlash Japanese flashcard server")]
struct Cli {
    /// Database URL (sqlite://, mysql://, postgres://)
    #[arg(long)]
    database_url: Option<String>,

    /// HTTP listen port
    #[arg(long)]
    port: Option<u16>,

    /// Bearer token gating the admin endpoints
    #[arg(long)]
    admin_token: Option<String>,

    /// Seed the lesson materials before serving
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting KanaFlash (kana-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = config::resolve(CliOverrides {
        database_url: cli.database_url,
        port: cli.port,
        admin_token: cli.admin_token,
    });

    let db = Db::connect(&config.database_url).await?;
    info!("✓ Database ready ({})", db.driver.as_str());

    if cli.seed {
        let inserted = seed::seed_materials(&db).await?;
        info!("✓ Seeder finished ({} lessons inserted)", inserted);
    }

    if config.admin_token.is_some() {
        info!("✓ Admin endpoint authentication enabled");
    } else {
        info!("Admin endpoint authentication disabled (no admin token configured)");
    }

    let state = AppState::new(db, config.admin_token.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("kana-web listening on http://127.0.0.1:{}", config.port);
    info!(
        "Health check: http://127.0.0.1:{}/health-check",
        config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
