use anyhow::{Context, Result};
use snak_chat::client::AccountClient;
use snak_chat::config::load_config;
use snak_chat::state::AppState;
use snak_chat::web::build_router;
use snak_db::{create_pool, run_chat_migrations};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting snak chat service");

    // Load configuration
    let config_path =
        std::env::var("SNAK_CHAT_CONFIG").unwrap_or_else(|_| "chat-config.yaml".to_string());
    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // Create database pool and run migrations
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    run_chat_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let accounts = AccountClient::new(
        &config.users_service_url,
        Duration::from_secs(config.lookup_timeout_secs),
    )
    .context("Failed to build account service client")?;

    tracing::info!("Validating identities against {}", config.users_service_url);

    let listen = config.listen.clone();
    let state = AppState::new(pool, accounts, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Chat service listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
