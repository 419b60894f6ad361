//! Message use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository stamping/translation contracts.
//! - The service layer remains storage-agnostic.

use crate::model::message::Message;
use crate::model::ActorId;
use crate::repo::message_repo::{MessageRepository, MessageSearchParams};
use crate::repo::RepoResult;

/// Use-case wrapper over a message repository handle.
pub struct MessageService<R: MessageRepository> {
    repo: R,
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new message; the caller's model receives the assigned
    /// identity and audit fields.
    pub fn create_message(&mut self, message: &mut Message, actor: ActorId) -> RepoResult<i64> {
        self.repo.create(message, actor)
    }

    pub fn get_message(&self, id: i64) -> RepoResult<Option<Message>> {
        self.repo.get_by_id(id)
    }

    /// Parameterized search; `params` is normalized (consumed) by the call.
    pub fn get_messages(&self, params: &mut MessageSearchParams) -> RepoResult<Vec<Message>> {
        self.repo.search_messages(params)
    }

    pub fn update_message(&mut self, message: &Message, actor: ActorId) -> RepoResult<()> {
        self.repo.update(message, actor)
    }

    pub fn delete_message(&mut self, message: &Message) -> RepoResult<()> {
        self.repo.delete(message)
    }
}
