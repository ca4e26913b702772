use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        login: &str,
        password_hash: &str,
        full_name: &str,
        email: &str,
    ) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (login, password_hash, full_name, email) VALUES ($1, $2, $3, $4) \
             RETURNING id, login, password_hash, full_name, email, created_at",
        )
        .bind(login)
        .bind(password_hash)
        .bind(full_name)
        .bind(email)
        .fetch_one(pool)
        .await
        .context("Failed to create user")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password_hash, full_name, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    pub async fn get_by_login(pool: &PgPool, login: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password_hash, full_name, email, created_at FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by login")?;
        Ok(row)
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password_hash, full_name, email, created_at FROM users \
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list users")?;
        Ok(rows)
    }

    /// Unpaginated listing backing the aggregate cache entry
    pub async fn list_all(pool: &PgPool) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password_hash, full_name, email, created_at FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list all users")?;
        Ok(rows)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        login: &str,
        full_name: &str,
        email: &str,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET login = $2, full_name = $3, email = $4 WHERE id = $1 \
             RETURNING id, login, password_hash, full_name, email, created_at",
        )
        .bind(id)
        .bind(login)
        .bind(full_name)
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to update user")?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "DELETE FROM users WHERE id = $1 \
             RETURNING id, login, password_hash, full_name, email, created_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to delete user")?;
        Ok(row)
    }
}
