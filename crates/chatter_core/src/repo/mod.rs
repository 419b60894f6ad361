//! Repository layer: generic CRUD/bulk operations over (domain, entity) pairs.
//!
//! # Responsibility
//! - Define the persistence entity contract and shared audit stamping rules.
//! - Provide one generic SQLite repository parameterized by an
//!   [`EntityMapper`], so callers never write per-entity SQL or translation.
//!
//! # Invariants
//! - `guid` and `created_*` are assigned exactly once, at create, by the
//!   repository; `modified_*` is refreshed on every mutation (create stamps
//!   modified equal to created).
//! - Bulk operations are atomic per call and treat an empty collection as a
//!   silent no-op.
//! - Backend errors propagate unmodified; a missing row on read is
//!   `Ok(None)`, never an error.

pub mod event_log_repo;
pub mod message_repo;
pub mod settings_repo;
mod sql;
pub mod user_repo;

use crate::db::{migrations, DbError};
use crate::filter::Filter;
use crate::mapper::{EntityMapper, FieldMapError, TranslationError};
use crate::model::{ActorId, AuditStamp};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Backend-reported failure, propagated unmodified.
    Db(DbError),
    /// A domain filter referenced an unmapped member.
    Translation(TranslationError),
    /// The mapper declared an entity column that is not a valid identifier.
    InvalidFieldMap(FieldMapError),
    /// Mutation target row does not exist.
    NotFound(i64),
    /// Persisted data cannot be decoded into a valid entity.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// The entity's table is missing from the connected database.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Translation(err) => write!(f, "{err}"),
            Self::InvalidFieldMap(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "row not found: id {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Translation(err) => Some(err),
            Self::InvalidFieldMap(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TranslationError> for RepoError {
    fn from(value: TranslationError) -> Self {
        Self::Translation(value)
    }
}

impl From<FieldMapError> for RepoError {
    fn from(value: FieldMapError) -> Self {
        Self::InvalidFieldMap(value)
    }
}

/// Identity/audit columns shared by every entity table, in storage order.
pub(crate) const STAMP_COLUMNS: &[&str] = &[
    "guid",
    "is_active",
    "created_on",
    "created_by",
    "modified_on",
    "modified_by",
];

/// Identity and audit metadata of a persistence entity row.
///
/// Structurally mirrors [`AuditStamp`] but belongs to the storage-facing type
/// family; the two only meet inside a mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityStamp {
    pub id: i64,
    pub guid: Uuid,
    pub is_active: bool,
    pub created_on: i64,
    pub created_by: ActorId,
    pub modified_on: i64,
    pub modified_by: ActorId,
}

impl EntityStamp {
    pub(crate) fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let guid_text: String = row.get("guid")?;
        let guid = Uuid::parse_str(&guid_text)
            .map_err(|_| RepoError::InvalidData(format!("invalid guid value `{guid_text}`")))?;

        let is_active = match row.get::<_, i64>("is_active")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid is_active value `{other}`"
                )));
            }
        };

        Ok(Self {
            id: row.get("id")?,
            guid,
            is_active,
            created_on: row.get("created_on")?,
            created_by: row.get("created_by")?,
            modified_on: row.get("modified_on")?,
            modified_by: row.get("modified_by")?,
        })
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.guid.to_string()),
            Value::Integer(i64::from(self.is_active)),
            Value::Integer(self.created_on),
            Value::Integer(self.created_by),
            Value::Integer(self.modified_on),
            Value::Integer(self.modified_by),
        ]
    }
}

impl From<&AuditStamp> for EntityStamp {
    fn from(stamp: &AuditStamp) -> Self {
        Self {
            id: stamp.id,
            guid: stamp.guid,
            is_active: stamp.is_active,
            created_on: stamp.created_on,
            created_by: stamp.created_by,
            modified_on: stamp.modified_on,
            modified_by: stamp.modified_by,
        }
    }
}

impl From<&EntityStamp> for AuditStamp {
    fn from(stamp: &EntityStamp) -> Self {
        Self {
            id: stamp.id,
            guid: stamp.guid,
            is_active: stamp.is_active,
            created_on: stamp.created_on,
            created_by: stamp.created_by,
            modified_on: stamp.modified_on,
            modified_by: stamp.modified_by,
        }
    }
}

/// Storage-facing contract for one entity table.
///
/// Data columns exclude the shared identity/audit set, which the repository
/// composes itself so audit stamping cannot be bypassed per entity.
pub trait PersistenceEntity: Sized {
    const TABLE: &'static str;
    /// Entity-specific data columns, in declaration order.
    const COLUMNS: &'static [&'static str];

    fn stamp(&self) -> &EntityStamp;
    fn stamp_mut(&mut self) -> &mut EntityStamp;
    /// Bind values parallel to [`Self::COLUMNS`].
    fn data_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Generic data-access contract over one domain model type.
///
/// One handle wraps one storage session and must not be shared across
/// concurrent callers; the SQLite implementation enforces this statically by
/// holding the connection by `&mut`.
pub trait Repository {
    type Model;

    /// Returns whether a row with this primary key exists.
    fn exists(&self, id: i64) -> RepoResult<bool>;
    fn get_by_id(&self, id: i64) -> RepoResult<Option<Self::Model>>;
    fn get_by_guid(&self, guid: Uuid) -> RepoResult<Option<Self::Model>>;
    /// Returns the first row matching a domain-space filter.
    fn first_where(&self, filter: &Filter) -> RepoResult<Option<Self::Model>>;

    fn get_all(&self) -> RepoResult<Vec<Self::Model>>;
    fn get_where(&self, filter: &Filter) -> RepoResult<Vec<Self::Model>>;
    /// Empty input yields an empty result, not an error.
    fn get_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Self::Model>>;
    fn get_by_guids(&self, guids: &[Uuid]) -> RepoResult<Vec<Self::Model>>;

    fn count_all(&self) -> RepoResult<u64>;
    fn count_where(&self, filter: &Filter) -> RepoResult<u64>;

    /// Persists a new row. Assigns guid and audit stamps, then writes the
    /// storage id and generated stamp back into the caller's model.
    fn create(&mut self, model: &mut Self::Model, actor: ActorId) -> RepoResult<i64>;
    /// Atomically persists a batch; empty input is a silent no-op. Unlike
    /// [`Repository::create`], generated identities are not written back.
    fn bulk_create(&mut self, models: &[Self::Model], actor: ActorId) -> RepoResult<()>;

    /// Full-row replace of data columns plus `is_active`; refreshes the
    /// modified stamp only. A missing target row is `NotFound`.
    fn update(&mut self, model: &Self::Model, actor: ActorId) -> RepoResult<()>;
    fn bulk_update(&mut self, models: &[Self::Model], actor: ActorId) -> RepoResult<()>;

    /// Physically removes the row. `is_active` is plain data, not a
    /// soft-delete channel.
    fn delete(&mut self, model: &Self::Model) -> RepoResult<()>;
    fn bulk_delete(&mut self, models: &[Self::Model]) -> RepoResult<()>;

    /// Commits a caller-opened explicit transaction on this session, if one
    /// is active. SQLite autocommits otherwise, making this a no-op.
    fn save_changes(&mut self) -> RepoResult<()>;
}

/// SQLite-backed generic repository over one (domain, entity) pair.
pub struct SqliteRepository<'conn, M: EntityMapper> {
    conn: &'conn mut Connection,
    mapper: M,
}

impl<'conn, M> SqliteRepository<'conn, M>
where
    M: EntityMapper,
    M::Entity: PersistenceEntity,
{
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection, mapper: M) -> RepoResult<Self> {
        mapper.field_map().validate()?;

        let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected = migrations::latest_version();
        if actual != expected {
            return Err(RepoError::UninitializedConnection {
                expected_version: expected,
                actual_version: actual,
            });
        }

        let tables: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [M::Entity::TABLE],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(RepoError::MissingRequiredTable(M::Entity::TABLE));
        }

        Ok(Self { conn, mapper })
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    fn query_models(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Vec<M::Model>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut models = Vec::new();

        while let Some(row) = rows.next()? {
            let entity = M::Entity::from_row(row)?;
            models.push(self.mapper.to_domain(&entity));
        }

        Ok(models)
    }

    fn query_first(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Option<M::Model>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;

        if let Some(row) = rows.next()? {
            let entity = M::Entity::from_row(row)?;
            return Ok(Some(self.mapper.to_domain(&entity)));
        }

        Ok(None)
    }
}

impl<M> Repository for SqliteRepository<'_, M>
where
    M: EntityMapper,
    M::Entity: PersistenceEntity,
{
    type Model = M::Model;

    fn exists(&self, id: i64) -> RepoResult<bool> {
        Ok(self.get_by_id(id)?.is_some())
    }

    fn get_by_id(&self, id: i64) -> RepoResult<Option<M::Model>> {
        let sql = format!("{} WHERE id = ?1;", select_sql::<M::Entity>());
        self.query_first(&sql, vec![Value::Integer(id)])
    }

    fn get_by_guid(&self, guid: Uuid) -> RepoResult<Option<M::Model>> {
        let sql = format!("{} WHERE guid = ?1;", select_sql::<M::Entity>());
        self.query_first(&sql, vec![Value::Text(guid.to_string())])
    }

    fn first_where(&self, filter: &Filter) -> RepoResult<Option<M::Model>> {
        let entity_filter = self.mapper.translate(filter)?;
        let (clause, binds) = sql::compile(&entity_filter);
        let sql = format!(
            "{} WHERE {clause} ORDER BY id ASC LIMIT 1;",
            select_sql::<M::Entity>()
        );
        self.query_first(&sql, binds)
    }

    fn get_all(&self) -> RepoResult<Vec<M::Model>> {
        let sql = format!("{} ORDER BY id ASC;", select_sql::<M::Entity>());
        self.query_models(&sql, Vec::new())
    }

    fn get_where(&self, filter: &Filter) -> RepoResult<Vec<M::Model>> {
        let entity_filter = self.mapper.translate(filter)?;
        let (clause, binds) = sql::compile(&entity_filter);
        let sql = format!(
            "{} WHERE {clause} ORDER BY id ASC;",
            select_sql::<M::Entity>()
        );
        self.query_models(&sql, binds)
    }

    fn get_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<M::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "{} WHERE id IN ({placeholders}) ORDER BY id ASC;",
            select_sql::<M::Entity>()
        );
        let binds = ids.iter().map(|id| Value::Integer(*id)).collect();
        self.query_models(&sql, binds)
    }

    fn get_by_guids(&self, guids: &[Uuid]) -> RepoResult<Vec<M::Model>> {
        if guids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; guids.len()].join(", ");
        let sql = format!(
            "{} WHERE guid IN ({placeholders}) ORDER BY id ASC;",
            select_sql::<M::Entity>()
        );
        let binds = guids
            .iter()
            .map(|guid| Value::Text(guid.to_string()))
            .collect();
        self.query_models(&sql, binds)
    }

    fn count_all(&self) -> RepoResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {};", M::Entity::TABLE);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn count_where(&self, filter: &Filter) -> RepoResult<u64> {
        let entity_filter = self.mapper.translate(filter)?;
        let (clause, binds) = sql::compile(&entity_filter);
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {clause};", M::Entity::TABLE);
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(binds), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn create(&mut self, model: &mut M::Model, actor: ActorId) -> RepoResult<i64> {
        let mut entity = self.mapper.to_entity(model);
        stamp_create(entity.stamp_mut(), actor, now_epoch_ms());
        insert_entity(self.conn, &mut entity)?;

        // The caller's model observes the assigned identity and audit fields.
        *model = self.mapper.to_domain(&entity);
        Ok(entity.stamp().id)
    }

    fn bulk_create(&mut self, models: &[M::Model], actor: ActorId) -> RepoResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        let now = now_epoch_ms();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for model in models {
            let mut entity = self.mapper.to_entity(model);
            stamp_create(entity.stamp_mut(), actor, now);
            insert_entity(&tx, &mut entity)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn update(&mut self, model: &M::Model, actor: ActorId) -> RepoResult<()> {
        let mut entity = self.mapper.to_entity(model);
        stamp_update(entity.stamp_mut(), actor, now_epoch_ms());
        update_entity(self.conn, &entity)
    }

    fn bulk_update(&mut self, models: &[M::Model], actor: ActorId) -> RepoResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        let now = now_epoch_ms();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for model in models {
            let mut entity = self.mapper.to_entity(model);
            stamp_update(entity.stamp_mut(), actor, now);
            update_entity(&tx, &entity)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn delete(&mut self, model: &M::Model) -> RepoResult<()> {
        let entity = self.mapper.to_entity(model);
        delete_row(self.conn, M::Entity::TABLE, entity.stamp().id)
    }

    fn bulk_delete(&mut self, models: &[M::Model]) -> RepoResult<()> {
        if models.is_empty() {
            return Ok(());
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for model in models {
            let entity = self.mapper.to_entity(model);
            delete_row(&tx, M::Entity::TABLE, entity.stamp().id)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn save_changes(&mut self) -> RepoResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }
}

fn select_sql<E: PersistenceEntity>() -> String {
    let mut columns = Vec::with_capacity(1 + STAMP_COLUMNS.len() + E::COLUMNS.len());
    columns.push("id");
    columns.extend_from_slice(STAMP_COLUMNS);
    columns.extend_from_slice(E::COLUMNS);
    format!("SELECT {} FROM {}", columns.join(", "), E::TABLE)
}

fn insert_entity<E: PersistenceEntity>(conn: &Connection, entity: &mut E) -> RepoResult<()> {
    let mut columns = Vec::with_capacity(STAMP_COLUMNS.len() + E::COLUMNS.len());
    columns.extend_from_slice(STAMP_COLUMNS);
    columns.extend_from_slice(E::COLUMNS);
    let placeholders = vec!["?"; columns.len()].join(", ");
    let statement = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        E::TABLE,
        columns.join(", "),
        placeholders
    );

    let mut binds = entity.stamp().bind_values();
    binds.extend(entity.data_values());
    conn.execute(&statement, params_from_iter(binds))?;
    entity.stamp_mut().id = conn.last_insert_rowid();

    Ok(())
}

fn update_entity<E: PersistenceEntity>(conn: &Connection, entity: &E) -> RepoResult<()> {
    let mut assignments = vec![
        "is_active = ?".to_string(),
        "modified_on = ?".to_string(),
        "modified_by = ?".to_string(),
    ];
    assignments.extend(E::COLUMNS.iter().map(|column| format!("{column} = ?")));
    let statement = format!(
        "UPDATE {} SET {} WHERE id = ?;",
        E::TABLE,
        assignments.join(", ")
    );

    let stamp = entity.stamp();
    let mut binds = vec![
        Value::Integer(i64::from(stamp.is_active)),
        Value::Integer(stamp.modified_on),
        Value::Integer(stamp.modified_by),
    ];
    binds.extend(entity.data_values());
    binds.push(Value::Integer(stamp.id));

    let changed = conn.execute(&statement, params_from_iter(binds))?;
    if changed == 0 {
        return Err(RepoError::NotFound(stamp.id));
    }

    Ok(())
}

fn delete_row(conn: &Connection, table: &str, id: i64) -> RepoResult<()> {
    let changed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?;
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }

    Ok(())
}

fn stamp_create(stamp: &mut EntityStamp, actor: ActorId, now: i64) {
    stamp.guid = Uuid::new_v4();
    stamp.created_on = now;
    stamp.created_by = actor;
    // Create counts as the first modification, with the same timestamp.
    stamp.modified_on = now;
    stamp.modified_by = actor;
}

fn stamp_update(stamp: &mut EntityStamp, actor: ActorId, now: i64) {
    stamp.modified_on = now;
    stamp.modified_by = actor;
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
