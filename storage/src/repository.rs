use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::models::{PageResult, PushMessageInformation, RecordFilter, SortOrder};

/// Number of records returned by the "last activity" dashboards.
pub const LAST_ACTIVITY_LIMIT: u32 = 3;

/// CRUD and reporting queries over push message information.
///
/// Owner-scoped methods take `Option<&str>`: `Some(login)` restricts to
/// applications (or variants) whose developer is `login`, `None` spans all of them.
#[async_trait]
pub trait PushMessageInformationDao: Send + Sync {
    async fn create(&self, info: &PushMessageInformation) -> Result<(), StorageError>;

    /// Merge semantics: inserts when absent, otherwise replaces the stored row
    /// and its variant metrics.
    async fn update(&self, info: &PushMessageInformation) -> Result<(), StorageError>;

    /// Fails with [`StorageError::NotFound`] when no record has `info.id`.
    async fn delete(&self, info: &PushMessageInformation) -> Result<(), StorageError>;

    async fn find(&self, id: &str) -> Result<Option<PushMessageInformation>, StorageError>;

    async fn find_all(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
    ) -> Result<Vec<PushMessageInformation>, StorageError>;

    async fn find_page(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<PushMessageInformation>, StorageError>;

    /// Most recent records first, at most `limit`.
    async fn find_last_activity(
        &self,
        owner: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PushMessageInformation>, StorageError>;

    async fn find_last_three_activity(
        &self,
        owner: Option<&str>,
    ) -> Result<Vec<PushMessageInformation>, StorageError> {
        self.find_last_activity(owner, LAST_ACTIVITY_LIMIT).await
    }

    async fn count_for_applications(&self, owner: Option<&str>) -> Result<i64, StorageError>;

    /// Distinct variant ids having at least one metric with a failed delivery.
    async fn find_variant_ids_with_warnings(
        &self,
        owner: Option<&str>,
    ) -> Result<Vec<String>, StorageError>;

    /// Removes every record submitted strictly before `oldest`; returns how many.
    async fn delete_older_than(&self, oldest: DateTime<Utc>) -> Result<u64, StorageError>;
}
