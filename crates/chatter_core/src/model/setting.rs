//! Application setting domain model.

use super::AuditStamp;
use serde::{Deserialize, Serialize};

/// Key/value application setting with display metadata.
///
/// `value` is stored as text; `value_type` records the declared type name so
/// consumers can parse it. Keys are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub stamp: AuditStamp,
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub display_name: String,
    pub description: String,
}

impl Setting {
    /// Creates an unsaved setting; identity is assigned by the repository.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            stamp: AuditStamp::unsaved(),
            key: key.into(),
            value: value.into(),
            value_type: value_type.into(),
            display_name: display_name.into(),
            description: description.into(),
        }
    }
}
