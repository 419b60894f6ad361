//! User persistence entity and mapper.

use crate::mapper::{EntityMapper, FieldMap};
use crate::model::user::User;
use crate::repo::{EntityStamp, PersistenceEntity, RepoResult, SqliteRepository};
use rusqlite::types::Value;
use rusqlite::Row;

/// Storage-facing row shape for the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntity {
    pub stamp: EntityStamp,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl PersistenceEntity for UserEntity {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["email", "first_name", "last_name"];

    fn stamp(&self) -> &EntityStamp {
        &self.stamp
    }

    fn stamp_mut(&mut self) -> &mut EntityStamp {
        &mut self.stamp
    }

    fn data_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.email.clone()),
            Value::Text(self.first_name.clone()),
            Value::Text(self.last_name.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            stamp: EntityStamp::from_row(row)?,
            email: row.get("email")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
        })
    }
}

/// Mapper crossing the user domain/entity boundary. All members are
/// identity-mapped.
#[derive(Debug, Clone)]
pub struct UserMapper {
    fields: FieldMap,
}

impl Default for UserMapper {
    fn default() -> Self {
        let fields = FieldMap::identity(&[
            "id",
            "guid",
            "is_active",
            "created_on",
            "created_by",
            "modified_on",
            "modified_by",
            "email",
            "first_name",
            "last_name",
        ]);
        Self { fields }
    }
}

impl EntityMapper for UserMapper {
    type Model = User;
    type Entity = UserEntity;

    fn to_entity(&self, model: &User) -> UserEntity {
        UserEntity {
            stamp: EntityStamp::from(&model.stamp),
            email: model.email.clone(),
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
        }
    }

    fn to_domain(&self, entity: &UserEntity) -> User {
        User {
            stamp: (&entity.stamp).into(),
            email: entity.email.clone(),
            first_name: entity.first_name.clone(),
            last_name: entity.last_name.clone(),
        }
    }

    fn field_map(&self) -> &FieldMap {
        &self.fields
    }
}

/// SQLite user repository handle.
pub type SqliteUserRepository<'conn> = SqliteRepository<'conn, UserMapper>;
