//! PostgreSQL-backed message store.
//!
//! Expects the `users` and `messages` tables to already exist:
//!
//! ```sql
//! CREATE TABLE users (
//!     username   TEXT PRIMARY KEY,
//!     first_name TEXT NOT NULL,
//!     last_name  TEXT NOT NULL,
//!     phone      TEXT NOT NULL
//! );
//!
//! CREATE TABLE messages (
//!     id            SERIAL PRIMARY KEY,
//!     from_username TEXT NOT NULL REFERENCES users,
//!     to_username   TEXT NOT NULL REFERENCES users,
//!     body          TEXT NOT NULL,
//!     sent_at       TIMESTAMPTZ NOT NULL,
//!     read_at       TIMESTAMPTZ
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{CreatedMessage, MessageDetail, MessageId, MessageRow, NewMessage, ReadReceipt};
use super::store::MessageStore;

const SELECT_MESSAGE: &str = r#"
    SELECT
        m.id, m.body, m.sent_at, m.read_at,
        f.username AS from_username, f.first_name AS from_first_name,
        f.last_name AS from_last_name, f.phone AS from_phone,
        t.username AS to_username, t.first_name AS to_first_name,
        t.last_name AS to_last_name, t.phone AS to_phone
    FROM messages AS m
    JOIN users AS f ON m.from_username = f.username
    JOIN users AS t ON m.to_username = t.username
    WHERE m.id = $1
"#;

pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, username: &str) -> Result<bool, DatabaseError> {
        let found: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn get(&self, id: MessageId) -> Result<MessageDetail, DatabaseError> {
        sqlx::query_as::<_, MessageRow>(SELECT_MESSAGE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(MessageDetail::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("No such message: {}", id)))
    }

    async fn create(&self, message: NewMessage) -> Result<CreatedMessage, DatabaseError> {
        if !self.user_exists(&message.to_username).await? {
            return Err(DatabaseError::NotFound(format!("No such user: {}", message.to_username)));
        }

        let created = sqlx::query_as::<_, CreatedMessage>(
            "INSERT INTO messages (from_username, to_username, body, sent_at)
             VALUES ($1, $2, $3, CURRENT_TIMESTAMP)
             RETURNING id, from_username, to_username, body, sent_at",
        )
        .bind(&message.from_username)
        .bind(&message.to_username)
        .bind(&message.body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unknown sender, or recipient removed since the existence check
            let foreign_key_violation = matches!(
                &e,
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23503")
            );
            if foreign_key_violation {
                DatabaseError::NotFound(format!(
                    "No such user: {} or {}",
                    message.from_username, message.to_username
                ))
            } else {
                DatabaseError::Sqlx(e)
            }
        })?;

        Ok(created)
    }

    async fn mark_read(&self, id: MessageId) -> Result<ReadReceipt, DatabaseError> {
        sqlx::query_as::<_, ReadReceipt>(
            "UPDATE messages
             SET read_at = COALESCE(read_at, CURRENT_TIMESTAMP)
             WHERE id = $1
             RETURNING id, read_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("No such message: {}", id)))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
