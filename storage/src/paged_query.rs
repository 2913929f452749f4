//! Filtered, ordered and paged lookups over push message information.
//!
//! Every listing in [`PushMessageInformationRepository`](crate::PushMessageInformationRepository)
//! goes through [`PagedQueryRunner`]. Filter values are always bound; the only
//! text spliced into a statement is the fixed ORDER BY clause for a [`SortOrder`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::models::{FilterField, PageResult, PushMessageInformation, RecordFilter, SortOrder};

/// Runs the select and count statements for a [`RecordFilter`].
pub struct PagedQueryRunner<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PagedQueryRunner<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetches page `page` (zero based) of at most `page_size` records plus the total match count.
    ///
    /// The two statements run concurrently on separate connections and are not
    /// isolated from each other, so under concurrent writes `total_count` may not
    /// agree with the returned page. A page past the end yields no records.
    pub async fn fetch_page(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<PushMessageInformation>> {
        if page_size == 0 {
            return Err(StorageError::InvalidPagination(
                "page size must be greater than zero".to_string(),
            ));
        }
        let offset = i64::from(page) * i64::from(page_size);

        let sql = format!(
            "{}{} LIMIT ? OFFSET ?",
            select_clause(filter.field),
            order_by(order)
        );
        let fetch = sqlx::query_as::<_, PushMessageInformation>(&sql)
            .bind(&filter.value)
            .bind(i64::from(page_size))
            .bind(offset)
            .fetch_all(self.pool);
        let count = sqlx::query_scalar::<_, i64>(count_clause(filter.field))
            .bind(&filter.value)
            .fetch_one(self.pool);

        let (records, total_count) = tokio::try_join!(fetch, count)?;

        debug!(
            "Retrieved page {} ({} of {} records) for {} '{}'",
            page,
            records.len(),
            total_count,
            filter.field,
            filter.value
        );
        Ok(PageResult::new(records, total_count))
    }

    /// Fetches every matching record, ordered by submit date.
    pub async fn fetch_all(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
    ) -> Result<Vec<PushMessageInformation>> {
        let sql = format!("{}{}", select_clause(filter.field), order_by(order));
        let records = sqlx::query_as::<_, PushMessageInformation>(&sql)
            .bind(&filter.value)
            .fetch_all(self.pool)
            .await?;

        debug!(
            "Retrieved {} records for {} '{}'",
            records.len(),
            filter.field,
            filter.value
        );
        Ok(records)
    }

    pub async fn count(&self, filter: &RecordFilter) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(count_clause(filter.field))
            .bind(&filter.value)
            .fetch_one(self.pool)
            .await?;
        Ok(total)
    }
}

fn select_clause(field: FilterField) -> &'static str {
    match field {
        FilterField::PushApplication => {
            "SELECT pmi.* FROM push_message_information pmi \
             WHERE pmi.push_application_id = ?"
        }
        FilterField::Variant => {
            "SELECT DISTINCT pmi.* FROM push_message_information pmi \
             JOIN variant_metric_information vmi ON vmi.push_message_information_id = pmi.id \
             WHERE vmi.variant_id = ?"
        }
    }
}

fn count_clause(field: FilterField) -> &'static str {
    match field {
        FilterField::PushApplication => {
            "SELECT COUNT(*) FROM push_message_information pmi \
             WHERE pmi.push_application_id = ?"
        }
        FilterField::Variant => {
            "SELECT COUNT(DISTINCT pmi.id) FROM push_message_information pmi \
             JOIN variant_metric_information vmi ON vmi.push_message_information_id = pmi.id \
             WHERE vmi.variant_id = ?"
        }
    }
}

/// Ties on `submit_date` are broken by id in the same direction, so the two
/// orders are exact reverses of each other.
pub(crate) fn order_by(order: SortOrder) -> String {
    let direction = order.as_sql();
    format!(" ORDER BY pmi.submit_date {direction}, pmi.id {direction}")
}
