//! Pictor - credential-gated image record service

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use pictor_api::{AppState, create_router};
use pictor_auth::JwtManager;
use pictor_db::Database;

/// Pictor - credential-gated image record service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "PICTOR_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "PICTOR_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_logging(&config.logging.level);

    info!("Starting Pictor v{}", env!("CARGO_PKG_VERSION"));

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Create default admin user if no users exist. Registration defaults
    // to the user role, so an empty store would otherwise have no admin.
    if !db.has_users().await? {
        info!("Creating default admin user");
        let password_hash = pictor_auth::hash_password("admin")?;
        db.insert_user(pictor_db::NewUser {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password_hash,
            role: pictor_db::UserRole::Admin,
        })
        .await?;
        info!("Default admin user created (username: admin, password: admin)");
    }

    // Initialize JWT manager with the process-wide signing secret
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.token_expiry_minutes,
    ));

    let state = AppState::new(db, jwt);

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
