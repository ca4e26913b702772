use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatRow {
    pub chat_id: i64,
    pub name: String,
    pub creator_id: i64,
    pub participants: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

pub struct ChatRepo;

impl ChatRepo {
    /// Insert a chat. The chat_id is assigned by the sequence here, after
    /// participant validation has already passed, so a failed validation
    /// never consumes an id. `participants` must already contain the
    /// creator and be free of duplicates.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        creator_id: i64,
        participants: &[i64],
    ) -> Result<i64> {
        let (chat_id,): (i64,) = sqlx::query_as(
            "INSERT INTO chats (name, creator_id, participants) VALUES ($1, $2, $3) \
             RETURNING chat_id",
        )
        .bind(name)
        .bind(creator_id)
        .bind(participants)
        .fetch_one(pool)
        .await
        .context("Failed to create chat")?;
        Ok(chat_id)
    }

    pub async fn get(pool: &PgPool, chat_id: i64) -> Result<Option<ChatRow>> {
        let row = sqlx::query_as::<_, ChatRow>(
            "SELECT chat_id, name, creator_id, participants, created_at FROM chats \
             WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get chat")?;
        Ok(row)
    }

    /// Set-union merge of `ids` into the participant array, in a single
    /// statement so concurrent merges never drop each other's additions.
    /// Ids already present are skipped, which keeps the merge idempotent.
    /// Returns the new participant array, or None if the chat is absent.
    pub async fn add_participants(
        pool: &PgPool,
        chat_id: i64,
        ids: &[i64],
    ) -> Result<Option<Vec<i64>>> {
        let row: Option<(Vec<i64>,)> = sqlx::query_as(
            "UPDATE chats SET participants = participants || ( \
                 SELECT COALESCE(array_agg(p), ARRAY[]::bigint[]) FROM unnest($2::bigint[]) AS p \
                 WHERE NOT (p = ANY(chats.participants)) \
             ) \
             WHERE chat_id = $1 \
             RETURNING participants",
        )
        .bind(chat_id)
        .bind(ids)
        .fetch_optional(pool)
        .await
        .context("Failed to add participants")?;
        Ok(row.map(|(participants,)| participants))
    }

    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<ChatRow>> {
        let rows = sqlx::query_as::<_, ChatRow>(
            "SELECT chat_id, name, creator_id, participants, created_at FROM chats \
             WHERE $1 = ANY(participants) ORDER BY chat_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list chats for user")?;
        Ok(rows)
    }
}
