//! Table and index definitions.
//!
//! Idempotent; every repository constructor runs it against its pool.

use sqlx::SqlitePool;
use tracing::info;

pub(crate) async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS push_applications (
            push_application_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            developer TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS variants (
            variant_id TEXT PRIMARY KEY,
            push_application_id TEXT NOT NULL,
            name TEXT NOT NULL,
            developer TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS push_message_information (
            id TEXT PRIMARY KEY,
            push_application_id TEXT NOT NULL,
            raw_json_message TEXT,
            ip_address TEXT,
            client_identifier TEXT,
            submit_date TEXT NOT NULL,
            total_receivers INTEGER NOT NULL DEFAULT 0,
            app_open_counter INTEGER NOT NULL DEFAULT 0,
            first_open_date TEXT,
            last_open_date TEXT
        );

        CREATE TABLE IF NOT EXISTS variant_metric_information (
            id TEXT PRIMARY KEY,
            push_message_information_id TEXT NOT NULL
                REFERENCES push_message_information(id) ON DELETE CASCADE,
            variant_id TEXT NOT NULL,
            receivers INTEGER NOT NULL DEFAULT 0,
            delivery_status INTEGER,
            reason TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_pmi_push_application_id ON push_message_information(push_application_id);
        CREATE INDEX IF NOT EXISTS idx_pmi_submit_date ON push_message_information(submit_date);
        CREATE INDEX IF NOT EXISTS idx_vmi_message_id ON variant_metric_information(push_message_information_id);
        CREATE INDEX IF NOT EXISTS idx_vmi_variant_id ON variant_metric_information(variant_id);
        CREATE INDEX IF NOT EXISTS idx_push_applications_developer ON push_applications(developer);
        CREATE INDEX IF NOT EXISTS idx_variants_developer ON variants(developer);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database tables created successfully");
    Ok(())
}
