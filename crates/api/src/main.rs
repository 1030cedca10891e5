use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inventory_core::roles::Role;
use inventory_core::user::NewUser;
use inventory_db::repositories::{SessionRepo, UserRepo};
use inventory_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_api::auth::password::hash_password;
use inventory_api::config::{LogFormat, ServerConfig};
use inventory_api::router::build_app_router;
use inventory_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "inventory_api=debug,inventory_db=info,tower_http=debug";

/// Inventory management API server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Command to run (defaults to `serve`).
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Create the initial super_admin account if it does not exist.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            let pool = connect(&config).await?;
            migrate(&pool).await
        }
        Command::Seed => {
            let pool = connect(&config).await?;
            seed(&pool).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn connect(config: &ServerConfig) -> anyhow::Result<DbPool> {
    let database_url = config.require_database_url()?;

    let pool = inventory_db::create_pool(database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    inventory_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    Ok(pool)
}

async fn migrate(pool: &DbPool) -> anyhow::Result<()> {
    inventory_db::run_migrations(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

async fn seed(pool: &DbPool) -> anyhow::Result<()> {
    let email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "superadmin@example.com".into());
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "password123".into());
    let name = std::env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "Super Admin".into());

    let password_hash = hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash seed password: {e}"))?;

    let inserted = UserRepo::new(pool.clone())
        .insert_if_absent(&NewUser {
            name,
            email: email.clone(),
            password_hash,
            role: Role::SuperAdmin,
        })
        .await?;

    if inserted {
        tracing::info!(%email, "Seeded super_admin account");
    } else {
        tracing::info!(%email, "Seed account already exists, skipping");
    }
    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let pool = connect(&config).await?;
    migrate(&pool).await?;

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRepo::new(pool.clone())),
        users: Arc::new(UserRepo::new(pool.clone())),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
