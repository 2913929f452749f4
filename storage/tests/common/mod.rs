//! Shared setup for storage integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use push_storage::{
    PushApplication, PushApplicationRepository, PushMessageInformation,
    PushMessageInformationDao, PushMessageInformationRepository, SqlitePoolManager, Variant,
};
use tempfile::TempDir;

/// Returns a fresh SQLite database path in a temp dir so each test gets an isolated DB.
/// SqlitePoolManager expects a file path (not a sqlite: URL).
pub fn fresh_db_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("test.db");
    let path_str = path.to_string_lossy().into_owned();
    (dir, path_str)
}

pub struct Fixture {
    pub _dir: TempDir,
    pub dao: PushMessageInformationRepository,
    pub apps: PushApplicationRepository,
    pub pool_manager: SqlitePoolManager,
}

pub async fn setup() -> Fixture {
    let (dir, database_url) = fresh_db_path();
    let pool_manager = SqlitePoolManager::new(&database_url)
        .await
        .expect("Failed to create pool");
    let dao = PushMessageInformationRepository::from_pool_manager(pool_manager.clone())
        .await
        .expect("Failed to create repository");
    let apps = PushApplicationRepository::new(pool_manager.clone())
        .await
        .expect("Failed to create application repository");

    Fixture {
        _dir: dir,
        dao,
        apps,
        pool_manager,
    }
}

/// Whole-minute timestamps so stored text sorts the same as time.
pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
}

pub async fn register_app(apps: &PushApplicationRepository, app_id: &str, developer: &str) {
    apps.save_application(&PushApplication {
        push_application_id: app_id.to_string(),
        name: format!("{} app", app_id),
        developer: developer.to_string(),
    })
    .await
    .expect("Failed to save application");
}

pub async fn register_variant(
    apps: &PushApplicationRepository,
    variant_id: &str,
    app_id: &str,
    developer: &str,
) {
    apps.save_variant(&Variant {
        variant_id: variant_id.to_string(),
        push_application_id: app_id.to_string(),
        name: format!("{} variant", variant_id),
        developer: developer.to_string(),
    })
    .await
    .expect("Failed to save variant");
}

/// Saves one record per minute in `minutes` for `app_id`; returns them in save order.
pub async fn seed(
    dao: &PushMessageInformationRepository,
    app_id: &str,
    minutes: impl IntoIterator<Item = i64>,
) -> Vec<PushMessageInformation> {
    let mut saved = Vec::new();
    for minute in minutes {
        let record = PushMessageInformation::submitted_at(app_id, at(minute));
        dao.create(&record).await.expect("Failed to save record");
        saved.push(record);
    }
    saved
}

pub fn ids(records: &[PushMessageInformation]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}
