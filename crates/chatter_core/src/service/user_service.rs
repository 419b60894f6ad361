//! User use-case service.

use crate::model::user::User;
use crate::model::ActorId;
use crate::repo::{RepoResult, Repository};
use uuid::Uuid;

/// Use-case wrapper over a user repository handle.
pub struct UserService<R: Repository<Model = User>> {
    repo: R,
}

impl<R: Repository<Model = User>> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_user(&mut self, user: &mut User, actor: ActorId) -> RepoResult<i64> {
        self.repo.create(user, actor)
    }

    pub fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        self.repo.get_by_id(id)
    }

    pub fn get_user_by_guid(&self, guid: Uuid) -> RepoResult<Option<User>> {
        self.repo.get_by_guid(guid)
    }

    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        self.repo.get_all()
    }

    pub fn update_user(&mut self, user: &User, actor: ActorId) -> RepoResult<()> {
        self.repo.update(user, actor)
    }

    pub fn delete_user(&mut self, user: &User) -> RepoResult<()> {
        self.repo.delete(user)
    }
}
