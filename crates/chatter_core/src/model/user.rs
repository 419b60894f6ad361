//! User domain model.

use super::AuditStamp;
use serde::{Deserialize, Serialize};

/// Business-facing user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub stamp: AuditStamp,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Creates an unsaved user; identity is assigned by the repository.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            stamp: AuditStamp::unsaved(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
