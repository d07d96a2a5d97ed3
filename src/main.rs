//! BabyBot Server
//!
//! A single-user web application for logging infant feeding events and
//! viewing daily summaries. Serves a JSON API plus the static client view,
//! backed by SQLite.
//!
//! # Configuration
//!
//! Environment variables:
//! - `BABYBOT_PORT`: Port to listen on (default: 8080)
//! - `BABYBOT_DATABASE_PATH`: SQLite database location
//! - `BABYBOT_STATIC_DIR`: Directory with the client assets (default: ./static)
//! - `SLACK_WEBHOOK_URL`: Webhook for feed notifications (optional)
//!
//! A YAML config file (default: ~/.config/babybot/config.yaml) may set the
//! same keys; environment variables take precedence.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /babies`, `POST /babies`, `PATCH /babies/update`
//! - `POST /feeds/add`, `DELETE /feeds/delete?id=`, `GET /feeds/today?date=`
//!
//! All other paths fall through to the static client view.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod models;
mod server;

use config::Config;
use server::notify::SlackNotifier;
use server::AppState;

#[derive(Parser)]
#[command(name = "babybot")]
#[command(version)]
#[command(about = "A baby feeding tracker web application", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Path to the SQLite database (overrides config)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "babybot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config)?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    tracing::info!("Database: {}", config.database_path.display());
    tracing::info!("Static assets: {}", config.static_dir.display());
    if config.slack_webhook_url.is_some() {
        tracing::info!("Feed notifications enabled");
    }

    let pool = db::init_db(&config.database_path).await?;
    let notifier = SlackNotifier::new(config.slack_webhook_url.clone());
    let state = AppState::new(pool, notifier);

    let app = server::router(state)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
