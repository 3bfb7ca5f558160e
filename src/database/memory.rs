use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{CreatedMessage, MessageDetail, MessageId, NewMessage, ReadReceipt, UserSummary};
use super::store::MessageStore;

#[derive(Debug, Clone)]
struct StoredMessage {
    from_username: String,
    to_username: String,
    body: String,
    sent_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, UserSummary>,
    messages: BTreeMap<MessageId, StoredMessage>,
    next_id: MessageId,
}

/// Process-local store for development runs and tests
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    inner: RwLock<Inner>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserSummary>) -> Self {
        let users = users
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect();
        Self {
            inner: RwLock::new(Inner {
                users,
                messages: BTreeMap::new(),
                next_id: 0,
            }),
        }
    }
}

impl Inner {
    fn user(&self, username: &str) -> Result<UserSummary, DatabaseError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("No such user: {}", username)))
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn get(&self, id: MessageId) -> Result<MessageDetail, DatabaseError> {
        let inner = self.inner.read().await;
        let stored = inner
            .messages
            .get(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("No such message: {}", id)))?;

        Ok(MessageDetail {
            id,
            body: stored.body.clone(),
            sent_at: stored.sent_at,
            read_at: stored.read_at,
            from_user: inner.user(&stored.from_username)?,
            to_user: inner.user(&stored.to_username)?,
        })
    }

    async fn create(&self, message: NewMessage) -> Result<CreatedMessage, DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.user(&message.from_username)?;
        inner.user(&message.to_username)?;

        inner.next_id += 1;
        let id = inner.next_id;
        let sent_at = Utc::now();
        inner.messages.insert(
            id,
            StoredMessage {
                from_username: message.from_username.clone(),
                to_username: message.to_username.clone(),
                body: message.body.clone(),
                sent_at,
                read_at: None,
            },
        );

        Ok(CreatedMessage {
            id,
            from_username: message.from_username,
            to_username: message.to_username,
            body: message.body,
            sent_at,
        })
    }

    async fn mark_read(&self, id: MessageId) -> Result<ReadReceipt, DatabaseError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .messages
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("No such message: {}", id)))?;

        let read_at = *stored.read_at.get_or_insert_with(Utc::now);
        Ok(ReadReceipt { id, read_at })
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
