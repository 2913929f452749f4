//! Push application and variant rows joined by owner-scoped reporting queries.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;
use crate::models::{PushApplication, Variant};
use crate::schema;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PushApplicationRepository {
    pool_manager: SqlitePoolManager,
}

impl PushApplicationRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self> {
        schema::init(pool_manager.pool()).await?;
        Ok(Self { pool_manager })
    }

    fn pool(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }

    /// Inserts or replaces the application row.
    pub async fn save_application(&self, app: &PushApplication) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO push_applications (push_application_id, name, developer)
            VALUES (?, ?, ?)
            ON CONFLICT(push_application_id) DO UPDATE SET
                name = excluded.name,
                developer = excluded.developer
            "#,
        )
        .bind(&app.push_application_id)
        .bind(&app.name)
        .bind(&app.developer)
        .execute(self.pool())
        .await?;

        info!(
            "Saved push application: id={}, developer={}",
            app.push_application_id, app.developer
        );
        Ok(())
    }

    /// Inserts or replaces the variant row.
    pub async fn save_variant(&self, variant: &Variant) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO variants (variant_id, push_application_id, name, developer)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(variant_id) DO UPDATE SET
                push_application_id = excluded.push_application_id,
                name = excluded.name,
                developer = excluded.developer
            "#,
        )
        .bind(&variant.variant_id)
        .bind(&variant.push_application_id)
        .bind(&variant.name)
        .bind(&variant.developer)
        .execute(self.pool())
        .await?;

        info!(
            "Saved variant: id={}, push_application_id={}",
            variant.variant_id, variant.push_application_id
        );
        Ok(())
    }

    pub async fn find_application(&self, push_application_id: &str) -> Result<Option<PushApplication>> {
        let app = sqlx::query_as::<_, PushApplication>(
            "SELECT * FROM push_applications WHERE push_application_id = ?",
        )
        .bind(push_application_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(app)
    }

    pub async fn find_variants_for_application(&self, push_application_id: &str) -> Result<Vec<Variant>> {
        let variants = sqlx::query_as::<_, Variant>(
            "SELECT * FROM variants WHERE push_application_id = ? ORDER BY variant_id",
        )
        .bind(push_application_id)
        .fetch_all(self.pool())
        .await?;

        Ok(variants)
    }
}
