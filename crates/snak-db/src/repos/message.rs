use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub message_id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

pub struct MessageRepo;

impl MessageRepo {
    /// Append a message with a server-assigned timestamp, clamped to the
    /// chat's current maximum so timestamps are non-decreasing per chat
    /// even if the wall clock steps backwards between appends.
    pub async fn append(
        pool: &PgPool,
        chat_id: i64,
        sender_id: i64,
        text: &str,
    ) -> Result<MessageRow> {
        let row = sqlx::query_as::<_, MessageRow>(
            "INSERT INTO messages (chat_id, sender_id, text, timestamp) \
             VALUES ($1, $2, $3, GREATEST( \
                 now(), \
                 COALESCE((SELECT max(timestamp) FROM messages WHERE chat_id = $1), now()) \
             )) \
             RETURNING message_id, chat_id, sender_id, text, timestamp",
        )
        .bind(chat_id)
        .bind(sender_id)
        .bind(text)
        .fetch_one(pool)
        .await
        .context("Failed to append message")?;
        Ok(row)
    }

    /// Full history in append order
    pub async fn list_for_chat(pool: &PgPool, chat_id: i64) -> Result<Vec<MessageRow>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT message_id, chat_id, sender_id, text, timestamp FROM messages \
             WHERE chat_id = $1 ORDER BY message_id",
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await
        .context("Failed to list messages")?;
        Ok(rows)
    }

    /// Newest-first, capped by limit
    pub async fn list_recent(pool: &PgPool, chat_id: i64, limit: i64) -> Result<Vec<MessageRow>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT message_id, chat_id, sender_id, text, timestamp FROM messages \
             WHERE chat_id = $1 ORDER BY timestamp DESC, message_id DESC LIMIT $2",
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to list recent messages")?;
        Ok(rows)
    }
}
