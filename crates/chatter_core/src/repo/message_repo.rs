//! Message persistence entity, mapper and search-enabled repository.
//!
//! # Responsibility
//! - Own the `messages` table shape and its domain/entity correspondence.
//! - Provide parameterized message search on top of the generic repository.
//!
//! # Invariants
//! - Domain member `text` maps to entity column `body`; all other members
//!   are identity-mapped.
//! - Message search narrows only: each active step ANDs onto the base query.

use crate::filter::Filter;
use crate::mapper::{EntityMapper, FieldMap};
use crate::model::message::Message;
use crate::repo::{EntityStamp, PersistenceEntity, RepoResult, Repository, SqliteRepository};
use crate::search::{SearchParams, SearchPipeline};
use rusqlite::types::Value;
use rusqlite::Row;

/// Storage-facing row shape for the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntity {
    pub stamp: EntityStamp,
    pub user_id: i64,
    pub channel_id: i64,
    pub body: String,
}

impl PersistenceEntity for MessageEntity {
    const TABLE: &'static str = "messages";
    const COLUMNS: &'static [&'static str] = &["user_id", "channel_id", "body"];

    fn stamp(&self) -> &EntityStamp {
        &self.stamp
    }

    fn stamp_mut(&mut self) -> &mut EntityStamp {
        &mut self.stamp
    }

    fn data_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.user_id),
            Value::Integer(self.channel_id),
            Value::Text(self.body.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            stamp: EntityStamp::from_row(row)?,
            user_id: row.get("user_id")?,
            channel_id: row.get("channel_id")?,
            body: row.get("body")?,
        })
    }
}

/// Mapper crossing the message domain/entity boundary.
#[derive(Debug, Clone)]
pub struct MessageMapper {
    fields: FieldMap,
}

impl Default for MessageMapper {
    fn default() -> Self {
        let fields = FieldMap::identity(&[
            "id",
            "guid",
            "is_active",
            "created_on",
            "created_by",
            "modified_on",
            "modified_by",
            "user_id",
            "channel_id",
        ])
        .rename("text", "body");
        Self { fields }
    }
}

impl EntityMapper for MessageMapper {
    type Model = Message;
    type Entity = MessageEntity;

    fn to_entity(&self, model: &Message) -> MessageEntity {
        MessageEntity {
            stamp: EntityStamp::from(&model.stamp),
            user_id: model.user_id,
            channel_id: model.channel_id,
            body: model.text.clone(),
        }
    }

    fn to_domain(&self, entity: &MessageEntity) -> Message {
        Message {
            stamp: (&entity.stamp).into(),
            user_id: entity.user_id,
            channel_id: entity.channel_id,
            text: entity.body.clone(),
        }
    }

    fn field_map(&self) -> &FieldMap {
        &self.fields
    }
}

/// SQLite message repository handle.
pub type SqliteMessageRepository<'conn> = SqliteRepository<'conn, MessageMapper>;

/// Search parameters for message queries.
///
/// String fields are lowercased in place when a pipeline consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSearchParams {
    pub channel_id: Option<i64>,
    pub search_query: Option<String>,
}

impl SearchParams for MessageSearchParams {
    fn normalize(&mut self) {
        if let Some(query) = self.search_query.as_mut() {
            *query = query.to_lowercase();
        }
    }
}

/// Builds the message search pipeline: channel equality, then text
/// containment. Steps are ANDed in this order.
pub fn message_search_pipeline() -> SearchPipeline<Filter, MessageSearchParams> {
    let mut pipeline: SearchPipeline<Filter, MessageSearchParams> = SearchPipeline::new();

    pipeline.add_step(
        |params: &MessageSearchParams| params.channel_id.is_some(),
        |query, params| match params.channel_id {
            Some(channel_id) => query.and(Filter::eq("channel_id", channel_id)),
            None => query,
        },
    );

    pipeline.add_step(
        |params: &MessageSearchParams| {
            params
                .search_query
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
        },
        |query, params| match params.search_query.as_deref() {
            Some(text) => query.and(Filter::contains("text", text.trim())),
            None => query,
        },
    );

    pipeline
}

/// Message reads/writes plus parameterized search.
pub trait MessageRepository: Repository<Model = Message> {
    /// Applies the search pipeline to the full message set and executes the
    /// refined query. `params` is normalized (consumed) by this call.
    fn search_messages(&self, params: &mut MessageSearchParams) -> RepoResult<Vec<Message>>;
}

impl MessageRepository for SqliteMessageRepository<'_> {
    fn search_messages(&self, params: &mut MessageSearchParams) -> RepoResult<Vec<Message>> {
        let filter = message_search_pipeline().apply(params, Filter::All);
        self.get_where(&filter)
    }
}
