//! Push message information repository: persistence and reporting queries.
//!
//! Uses SqlitePoolManager, PagedQueryRunner and the models (PushMessageInformation,
//! VariantMetricInformation, RecordFilter, PageResult).
//! External: SQLite via sqlx; callers go through the PushMessageInformationDao trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    query::Query,
    sqlite::{Sqlite, SqliteArguments},
    SqliteConnection, SqlitePool,
};
use tracing::{info, info_span, Span};

use crate::error::{Result, StorageError};
use crate::models::{
    PageResult, PushMessageInformation, RecordFilter, SortOrder, VariantMetricInformation,
};
use crate::paged_query::{order_by, PagedQueryRunner};
use crate::repository::PushMessageInformationDao;
use crate::schema;
use crate::sqlite_pool::SqlitePoolManager;

/// Upper bound on ids bound into one `IN (...)` list.
const ID_CHUNK_SIZE: usize = 500;

const INSERT_RECORD: &str = r#"
    INSERT INTO push_message_information
        (id, push_application_id, raw_json_message, ip_address, client_identifier,
         submit_date, total_receivers, app_open_counter, first_open_date, last_open_date)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_RECORD: &str = r#"
    INSERT INTO push_message_information
        (id, push_application_id, raw_json_message, ip_address, client_identifier,
         submit_date, total_receivers, app_open_counter, first_open_date, last_open_date)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        push_application_id = excluded.push_application_id,
        raw_json_message = excluded.raw_json_message,
        ip_address = excluded.ip_address,
        client_identifier = excluded.client_identifier,
        submit_date = excluded.submit_date,
        total_receivers = excluded.total_receivers,
        app_open_counter = excluded.app_open_counter,
        first_open_date = excluded.first_open_date,
        last_open_date = excluded.last_open_date
"#;

#[derive(sqlx::FromRow)]
struct MetricRow {
    push_message_information_id: String,
    #[sqlx(flatten)]
    info: VariantMetricInformation,
}

#[derive(Clone)]
pub struct PushMessageInformationRepository {
    pool_manager: SqlitePoolManager,
    span: Span,
}

impl PushMessageInformationRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::from_pool_manager(pool_manager).await
    }

    /// Shares an existing pool; creates the tables if needed.
    pub async fn from_pool_manager(pool_manager: SqlitePoolManager) -> Result<Self> {
        schema::init(pool_manager.pool()).await?;
        Ok(Self {
            pool_manager,
            span: info_span!("push_message_information"),
        })
    }

    /// Replaces the span that parents this repository's log events.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn pool(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }

    fn runner(&self) -> PagedQueryRunner<'_> {
        PagedQueryRunner::new(self.pool())
    }

    async fn insert_variant_informations(
        conn: &mut SqliteConnection,
        message_id: &str,
        infos: &[VariantMetricInformation],
    ) -> Result<()> {
        for vmi in infos {
            sqlx::query(
                r#"
                INSERT INTO variant_metric_information
                    (id, push_message_information_id, variant_id, receivers, delivery_status, reason)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&vmi.id)
            .bind(message_id)
            .bind(&vmi.variant_id)
            .bind(vmi.receivers)
            .bind(vmi.delivery_status)
            .bind(&vmi.reason)
            .execute(&mut *conn)
            .await
            .map_err(|e| StorageError::on_insert(e, &vmi.id))?;
        }
        Ok(())
    }

    /// Fills `variant_informations` of every record from one query per id chunk.
    async fn load_variant_informations(&self, records: &mut [PushMessageInformation]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let mut by_message: HashMap<String, Vec<VariantMetricInformation>> = HashMap::new();

        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT * FROM variant_metric_information \
                 WHERE push_message_information_id IN ({placeholders}) \
                 ORDER BY variant_id, id"
            );

            let mut query_builder = sqlx::query_as::<_, MetricRow>(&sql);
            for id in chunk {
                query_builder = query_builder.bind(*id);
            }

            for row in query_builder.fetch_all(self.pool()).await? {
                by_message
                    .entry(row.push_message_information_id)
                    .or_default()
                    .push(row.info);
            }
        }

        for record in records.iter_mut() {
            record.variant_informations = by_message.remove(&record.id).unwrap_or_default();
        }
        Ok(())
    }
}

fn bind_record<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    info: &'q PushMessageInformation,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(&info.id)
        .bind(&info.push_application_id)
        .bind(&info.raw_json_message)
        .bind(&info.ip_address)
        .bind(&info.client_identifier)
        .bind(info.submit_date)
        .bind(info.total_receivers)
        .bind(info.app_open_counter)
        .bind(info.first_open_date)
        .bind(info.last_open_date)
}

/// Subquery selecting the application ids visible to `owner`.
fn owned_applications(owner: Option<&str>) -> &'static str {
    match owner {
        Some(_) => "SELECT p.push_application_id FROM push_applications p WHERE p.developer = ?",
        None => "SELECT p.push_application_id FROM push_applications p",
    }
}

/// Subquery selecting the variant ids visible to `owner`.
fn owned_variants(owner: Option<&str>) -> &'static str {
    match owner {
        Some(_) => "SELECT v.variant_id FROM variants v WHERE v.developer = ?",
        None => "SELECT v.variant_id FROM variants v",
    }
}

#[async_trait]
impl PushMessageInformationDao for PushMessageInformationRepository {
    async fn create(&self, info: &PushMessageInformation) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        bind_record(sqlx::query(INSERT_RECORD), info)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::on_insert(e, &info.id))?;
        Self::insert_variant_informations(&mut *tx, &info.id, &info.variant_informations).await?;

        tx.commit().await?;

        info!(
            parent: &self.span,
            "Saved push message information: id={}, push_application_id={}",
            info.id, info.push_application_id
        );
        Ok(())
    }

    async fn update(&self, info: &PushMessageInformation) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        bind_record(sqlx::query(UPSERT_RECORD), info)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM variant_metric_information WHERE push_message_information_id = ?")
            .bind(&info.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_variant_informations(&mut *tx, &info.id, &info.variant_informations).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, info: &PushMessageInformation) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM variant_metric_information WHERE push_message_information_id = ?")
            .bind(&info.id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM push_message_information WHERE id = ?")
            .bind(&info.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(info.id.clone()));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<PushMessageInformation>> {
        let record = sqlx::query_as::<_, PushMessageInformation>(
            "SELECT * FROM push_message_information WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        match record {
            Some(record) => {
                let mut records = [record];
                self.load_variant_informations(&mut records).await?;
                let [record] = records;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
    ) -> Result<Vec<PushMessageInformation>> {
        let mut records = self.runner().fetch_all(filter, order).await?;
        self.load_variant_informations(&mut records).await?;
        Ok(records)
    }

    async fn find_page(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<PushMessageInformation>> {
        let mut result = self
            .runner()
            .fetch_page(filter, order, page, page_size)
            .await?;
        self.load_variant_informations(&mut result.records).await?;
        Ok(result)
    }

    async fn find_last_activity(
        &self,
        owner: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PushMessageInformation>> {
        let sql = format!(
            "SELECT pmi.* FROM push_message_information pmi \
             WHERE pmi.push_application_id IN ({}){} LIMIT ?",
            owned_applications(owner),
            order_by(SortOrder::Descending)
        );

        let mut query_builder = sqlx::query_as::<_, PushMessageInformation>(&sql);
        if let Some(login) = owner {
            query_builder = query_builder.bind(login);
        }
        let mut records = query_builder
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        self.load_variant_informations(&mut records).await?;
        Ok(records)
    }

    async fn count_for_applications(&self, owner: Option<&str>) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM push_message_information pmi \
             WHERE pmi.push_application_id IN ({})",
            owned_applications(owner)
        );

        let mut query_builder = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(login) = owner {
            query_builder = query_builder.bind(login);
        }
        Ok(query_builder.fetch_one(self.pool()).await?)
    }

    async fn find_variant_ids_with_warnings(&self, owner: Option<&str>) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT vmi.variant_id FROM variant_metric_information vmi \
             WHERE vmi.variant_id IN ({}) AND vmi.delivery_status = 0 \
             ORDER BY vmi.variant_id",
            owned_variants(owner)
        );

        let mut query_builder = sqlx::query_scalar::<_, String>(&sql);
        if let Some(login) = owner {
            query_builder = query_builder.bind(login);
        }
        Ok(query_builder.fetch_all(self.pool()).await?)
    }

    async fn delete_older_than(&self, oldest: DateTime<Utc>) -> Result<u64> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "DELETE FROM variant_metric_information WHERE push_message_information_id IN \
             (SELECT id FROM push_message_information WHERE submit_date < ?)",
        )
        .bind(oldest)
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query("DELETE FROM push_message_information WHERE submit_date < ?")
            .bind(oldest)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            parent: &self.span,
            "Deleted {} outdated push message information records (submitted before {})",
            result.rows_affected(),
            oldest
        );
        Ok(result.rows_affected())
    }
}
