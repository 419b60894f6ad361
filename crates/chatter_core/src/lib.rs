//! Core data-access and domain logic for Chatter.
//! This crate is the single source of truth for persistence invariants.

pub mod config;
pub mod db;
pub mod filter;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod repo;
pub mod search;
pub mod service;
pub mod tasks;

pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use filter::{CmpOp, Filter, Scalar};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mapper::{EntityMapper, FieldMap, FieldMapError, TranslationError};
pub use model::message::Message;
pub use model::setting::Setting;
pub use model::user::User;
pub use model::{ActorId, AuditStamp};
pub use registry::{
    register_by_convention, Candidate, Lifetime, RegistrationEntry, RegistrationTable,
    RegistryError, ServiceContainer,
};
pub use repo::event_log_repo::{EventLogRepository, SqliteEventLogRepository};
pub use repo::message_repo::{
    message_search_pipeline, MessageMapper, MessageRepository, MessageSearchParams,
    SqliteMessageRepository,
};
pub use repo::settings_repo::{SettingMapper, SettingsRepository, SqliteSettingsRepository};
pub use repo::user_repo::{SqliteUserRepository, UserMapper};
pub use repo::{
    EntityStamp, PersistenceEntity, RepoError, RepoResult, Repository, SqliteRepository,
};
pub use search::{SearchParams, SearchPipeline, SearchStep};
pub use service::message_service::MessageService;
pub use service::user_service::UserService;
pub use tasks::event_log_cleanup::EventLogCleanupTask;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
