//! Ownership rules for individual messages.
//!
//! Both checks are pure: they only compare the caller against the usernames
//! already resolved on the loaded message.

use crate::database::models::MessageDetail;
use crate::error::ApiError;

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(&'static str),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }

    /// Turn a denial into a 401 response without exposing message contents
    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Access::Allowed => Ok(()),
            Access::Denied(reason) => Err(ApiError::unauthorized(reason)),
        }
    }
}

/// Sender and recipient may view a message
pub fn authorize_view(message: &MessageDetail, username: &str) -> Access {
    if message.from_user.username == username || message.to_user.username == username {
        Access::Allowed
    } else {
        Access::Denied("You are not allowed to view this message")
    }
}

/// Only the recipient may mark a message as read
pub fn authorize_mark_read(message: &MessageDetail, username: &str) -> Access {
    if message.to_user.username == username {
        Access::Allowed
    } else {
        Access::Denied("Only the recipient can mark this message as read")
    }
}
