//! Message domain model.

use super::AuditStamp;
use serde::{Deserialize, Serialize};

/// Business-facing channel message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub stamp: AuditStamp,
    /// Author user id (foreign key into `users`).
    pub user_id: i64,
    pub channel_id: i64,
    pub text: String,
}

impl Message {
    /// Creates an unsaved message; identity is assigned by the repository.
    pub fn new(user_id: i64, channel_id: i64, text: impl Into<String>) -> Self {
        Self {
            stamp: AuditStamp::unsaved(),
            user_id,
            channel_id,
            text: text.into(),
        }
    }
}
