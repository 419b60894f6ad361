//! Setting persistence entity, mapper and keyed-value lookup.
//!
//! # Responsibility
//! - Own the `settings` table shape and its domain/entity correspondence.
//! - Provide key-based value lookup with a caller-supplied fallback.
//!
//! # Invariants
//! - Keys are unique; lookup by key yields at most one row.
//! - Domain member `value_type` maps to entity column `type`; all other
//!   members are identity-mapped.
//! - An empty key never reaches the database and resolves to the fallback.

use crate::filter::Filter;
use crate::mapper::{EntityMapper, FieldMap};
use crate::model::setting::Setting;
use crate::repo::{EntityStamp, PersistenceEntity, RepoResult, Repository, SqliteRepository};
use rusqlite::types::Value;
use rusqlite::Row;

/// Storage-facing row shape for the `settings` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntity {
    pub stamp: EntityStamp,
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub display_name: String,
    pub description: String,
}

impl PersistenceEntity for SettingEntity {
    const TABLE: &'static str = "settings";
    const COLUMNS: &'static [&'static str] =
        &["key", "value", "type", "display_name", "description"];

    fn stamp(&self) -> &EntityStamp {
        &self.stamp
    }

    fn stamp_mut(&mut self) -> &mut EntityStamp {
        &mut self.stamp
    }

    fn data_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.key.clone()),
            Value::Text(self.value.clone()),
            Value::Text(self.value_type.clone()),
            Value::Text(self.display_name.clone()),
            Value::Text(self.description.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            stamp: EntityStamp::from_row(row)?,
            key: row.get("key")?,
            value: row.get("value")?,
            value_type: row.get("type")?,
            display_name: row.get("display_name")?,
            description: row.get("description")?,
        })
    }
}

/// Mapper crossing the setting domain/entity boundary.
#[derive(Debug, Clone)]
pub struct SettingMapper {
    fields: FieldMap,
}

impl Default for SettingMapper {
    fn default() -> Self {
        let fields = FieldMap::identity(&[
            "id",
            "guid",
            "is_active",
            "created_on",
            "created_by",
            "modified_on",
            "modified_by",
            "key",
            "value",
            "display_name",
            "description",
        ])
        .rename("value_type", "type");
        Self { fields }
    }
}

impl EntityMapper for SettingMapper {
    type Model = Setting;
    type Entity = SettingEntity;

    fn to_entity(&self, model: &Setting) -> SettingEntity {
        SettingEntity {
            stamp: EntityStamp::from(&model.stamp),
            key: model.key.clone(),
            value: model.value.clone(),
            value_type: model.value_type.clone(),
            display_name: model.display_name.clone(),
            description: model.description.clone(),
        }
    }

    fn to_domain(&self, entity: &SettingEntity) -> Setting {
        Setting {
            stamp: (&entity.stamp).into(),
            key: entity.key.clone(),
            value: entity.value.clone(),
            value_type: entity.value_type.clone(),
            display_name: entity.display_name.clone(),
            description: entity.description.clone(),
        }
    }

    fn field_map(&self) -> &FieldMap {
        &self.fields
    }
}

/// SQLite settings repository handle.
pub type SqliteSettingsRepository<'conn> = SqliteRepository<'conn, SettingMapper>;

/// Setting reads/writes plus keyed value lookup.
pub trait SettingsRepository: Repository<Model = Setting> {
    /// Returns the stored value for `key`, or `None` when the key is blank
    /// or not present.
    fn try_get_setting_value(&self, key: &str) -> RepoResult<Option<String>>;

    /// Returns the stored value for `key`, falling back to `default` when
    /// the key is blank or not present.
    fn get_setting_value(&self, key: &str, default: &str) -> RepoResult<String> {
        Ok(self
            .try_get_setting_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn try_get_setting_value(&self, key: &str) -> RepoResult<Option<String>> {
        if key.trim().is_empty() {
            return Ok(None);
        }

        let found = self.first_where(&Filter::eq("key", key))?;
        Ok(found.map(|setting| setting.value))
    }
}
