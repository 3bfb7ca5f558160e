use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{CreatedMessage, MessageDetail, MessageId, NewMessage, ReadReceipt};

/// Persistence seam for messages. Implementations own their own consistency.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Load a message with both participants resolved, or `NotFound`
    async fn get(&self, id: MessageId) -> Result<MessageDetail, DatabaseError>;

    /// Persist a new unread message. An unknown recipient is `NotFound`.
    async fn create(&self, message: NewMessage) -> Result<CreatedMessage, DatabaseError>;

    /// Stamp `read_at` if it is not already set and return the stored value
    async fn mark_read(&self, id: MessageId) -> Result<ReadReceipt, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;
}
