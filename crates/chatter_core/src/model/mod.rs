//! Domain model family used by business logic.
//!
//! # Responsibility
//! - Define the business-facing record shapes and shared audit metadata.
//! - Keep domain types free of any storage/SQL concerns.
//!
//! # Invariants
//! - Every domain model embeds one [`AuditStamp`].
//! - `guid` is assigned once by the repository at creation and never reused.
//! - `created_*` fields are written exactly once; `modified_*` fields are
//!   refreshed on every mutation.

pub mod message;
pub mod setting;
pub mod user;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the caller performing a mutation, stamped into audit fields.
pub type ActorId = i64;

/// Identity and audit metadata embedded in every domain model.
///
/// `id` is the storage-assigned primary key (`0` until first persisted);
/// `guid` is the stable global identifier. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub id: i64,
    pub guid: Uuid,
    pub is_active: bool,
    pub created_on: i64,
    pub created_by: ActorId,
    pub modified_on: i64,
    pub modified_by: ActorId,
}

impl AuditStamp {
    /// Stamp for a model that has not been persisted yet.
    ///
    /// The repository assigns `id`, `guid` and all audit fields on create.
    pub fn unsaved() -> Self {
        Self {
            id: 0,
            guid: Uuid::nil(),
            is_active: true,
            created_on: 0,
            created_by: 0,
            modified_on: 0,
            modified_by: 0,
        }
    }

    /// Returns whether this model has been assigned a storage identity.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

impl Default for AuditStamp {
    fn default() -> Self {
        Self::unsaved()
    }
}
