use anyhow::Result;
use sqlx::PgPool;

/// Create a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPool::connect(database_url).await?;
    Ok(pool)
}

/// Run account-store migrations (the user service's database)
pub async fn run_user_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations/users").run(pool).await?;
    Ok(())
}

/// Run chat-store migrations (the chat service's database)
pub async fn run_chat_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations/chat").run(pool).await?;
    Ok(())
}
