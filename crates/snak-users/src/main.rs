use anyhow::{Context, Result};
use snak_db::{create_pool, run_user_migrations, UserRepo};
use snak_users::auth::hash_password;
use snak_users::cache::AccountCache;
use snak_users::config::load_config;
use snak_users::state::AppState;
use snak_users::web::build_router;
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

    tracing::info!("Starting snak account service");

    // Load configuration
    let config_path =
        std::env::var("SNAK_USERS_CONFIG").unwrap_or_else(|_| "users-config.yaml".to_string());
    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // Create database pool and run migrations
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    run_user_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Seed initial account if configured
    if let Some(initial) = &config.auth.initial_account {
        match UserRepo::get_by_login(&pool, &initial.login).await {
            Ok(Some(_)) => {
                tracing::info!(
                    "Initial account '{}' already exists, skipping seed",
                    initial.login
                );
            }
            Ok(None) => {
                let password_hash = hash_password(&initial.password)
                    .context("Failed to hash initial account password")?;
                UserRepo::create(
                    &pool,
                    &initial.login,
                    &password_hash,
                    &initial.full_name,
                    &initial.email,
                )
                .await
                .context("Failed to create initial account")?;
                tracing::info!("Created initial account: {}", initial.login);
            }
            Err(e) => {
                tracing::warn!("Failed to check for initial account: {}", e);
            }
        }
    }

    // Build the cache accelerator
    let cache = AccountCache::new(
        &config.redis.url,
        Duration::from_secs(config.redis.user_ttl_secs),
        Duration::from_secs(config.redis.users_all_ttl_secs),
    )
    .context("Failed to create account cache")?;

    let listen = config.listen.clone();
    let state = AppState::new(pool, cache, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Account service listening on {}", listen);

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
