//! halunder-store - Corpus Store service
//!
//! Serves the Halunder/German sentence-pair corpus over HTTP for review
//! workbenches and the processing engine.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use halunder_common::config::{self, FileConfig};
use halunder_store::{build_router, db, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for halunder-store
#[derive(Parser, Debug)]
#[command(name = "halunder-store")]
#[command(about = "Corpus store for the Halunder sentence-pair workbench")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HALUNDER_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "HALUNDER_BIND")]
    bind: std::net::IpAddr,

    /// SQLite database file
    #[arg(short, long, env = "HALUNDER_DB_PATH")]
    database: Option<PathBuf>,

    /// Operator names to make available in the user list
    #[arg(short, long = "user", env = "HALUNDER_USERS", value_delimiter = ',')]
    users: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halunder_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Halunder corpus store v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let file: FileConfig = config::load_file_config().context("Failed to load config file")?;

    let port = config::resolve(args.port, file.port, || config::DEFAULT_PORT);
    let db_path = config::resolve(args.database, file.database_path, config::default_database_path);
    let users = if args.users.is_empty() {
        file.users.unwrap_or_default()
    } else {
        args.users
    };

    info!("Database path: {}", db_path.display());
    let pool = db::init_database(&db_path).await?;

    let added = db::users::ensure_users(&pool, &users)
        .await
        .context("Failed to seed users")?;
    if added > 0 {
        info!("Added {} operator(s) to the user list", added);
    }

    let app = build_router(AppState::new(pool));

    let addr = SocketAddr::new(args.bind, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("halunder-store listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
