//! Storage crate: push message information persistence and reporting queries.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – PushMessageInformation, VariantMetricInformation, PushApplication, Variant,
//!   RecordFilter, SortOrder, PageResult
//! - [`repository`] – PushMessageInformationDao trait
//! - [`paged_query`] – PagedQueryRunner (filtered, ordered, paged lookups)
//! - [`push_message_repo`] – PushMessageInformationRepository (SQLite)
//! - [`application_repo`] – PushApplicationRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod application_repo;
mod error;
mod models;
mod paged_query;
mod push_message_repo;
mod repository;
mod schema;
mod sqlite_pool;

pub use application_repo::PushApplicationRepository;
pub use error::{Result, StorageError};
pub use models::{
    FilterField, PageResult, PushApplication, PushMessageInformation, RecordFilter, SortOrder,
    Variant, VariantMetricInformation,
};
pub use paged_query::PagedQueryRunner;
pub use push_message_repo::PushMessageInformationRepository;
pub use repository::{PushMessageInformationDao, LAST_ACTIVITY_LIMIT};
pub use sqlite_pool::SqlitePoolManager;
