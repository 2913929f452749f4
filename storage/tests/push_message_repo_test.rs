//! Integration tests for [`push_storage::PushMessageInformationRepository`].
//!
//! Covers CRUD, owner-scoped reporting queries and retention cleanup using a temp-file SQLite database.

mod common;

use common::{at, ids, register_app, register_variant, seed, setup};
use push_storage::{
    PushMessageInformation, PushMessageInformationDao, RecordFilter, SortOrder, StorageError,
    VariantMetricInformation,
};

/// **Test: Find a record by id when it exists.**
///
/// **Setup:** Save one record with two variant metrics.
/// **Action:** `find(&record.id)`.
/// **Expected:** Returns the record with its metrics.
#[tokio::test]
async fn test_find_existing() {
    let fx = setup().await;
    let mut record = PushMessageInformation::submitted_at("app-1", at(5))
        .with_variant_information(VariantMetricInformation::new("variant-a", 10).delivered())
        .with_variant_information(VariantMetricInformation::new("variant-b", 3).failed("bad token"));
    record.raw_json_message = Some(r#"{"alert":"hello"}"#.to_string());
    record.ip_address = Some("127.0.0.1".to_string());

    fx.dao.create(&record).await.expect("Failed to save record");

    let found = fx
        .dao
        .find(&record.id)
        .await
        .expect("Failed to find record")
        .expect("Record missing");

    assert_eq!(found.id, record.id);
    assert_eq!(found.push_application_id, "app-1");
    assert_eq!(found.submit_date, at(5));
    assert_eq!(found.total_receivers, 13);
    assert_eq!(found.raw_json_message.as_deref(), Some(r#"{"alert":"hello"}"#));
    assert_eq!(found.variant_informations.len(), 2);
    assert_eq!(found.variant_informations[0].variant_id, "variant-a");
    assert_eq!(found.variant_informations[0].delivery_status, Some(true));
    assert_eq!(found.variant_informations[1].delivery_status, Some(false));
    assert_eq!(found.variant_informations[1].reason.as_deref(), Some("bad token"));
}

/// **Test: Find a record by id when none has that id.**
///
/// **Setup:** Empty DB.
/// **Action:** `find("non-existent-id")`.
/// **Expected:** Returns `None`.
#[tokio::test]
async fn test_find_not_found() {
    let fx = setup().await;

    let found = fx
        .dao
        .find("non-existent-id")
        .await
        .expect("Failed to query");

    assert!(found.is_none());
}

/// **Test: Creating the same id twice.**
///
/// **Setup:** Save one record.
/// **Action:** `create` the same record again.
/// **Expected:** `StorageError::AlreadyExists` with the id.
#[tokio::test]
async fn test_create_duplicate_id() {
    let fx = setup().await;
    let record = PushMessageInformation::new("app-1");
    fx.dao.create(&record).await.expect("Failed to save record");

    let err = fx.dao.create(&record).await.unwrap_err();

    assert!(matches!(err, StorageError::AlreadyExists(ref id) if *id == record.id));
}

/// **Test: Update replaces the stored row and its metrics.**
///
/// **Setup:** Save a record with one metric.
/// **Action:** Change counters, swap metrics, `update`.
/// **Expected:** `find` returns the new values and only the new metric.
#[tokio::test]
async fn test_update_merges_existing() {
    let fx = setup().await;
    let mut record = PushMessageInformation::submitted_at("app-1", at(1))
        .with_variant_information(VariantMetricInformation::new("variant-a", 4));
    fx.dao.create(&record).await.expect("Failed to save record");

    record.app_open_counter = 7;
    record.first_open_date = Some(at(2));
    record.last_open_date = Some(at(9));
    record.variant_informations =
        vec![VariantMetricInformation::new("variant-b", 6).failed("expired")];
    fx.dao.update(&record).await.expect("Failed to update record");

    let found = fx
        .dao
        .find(&record.id)
        .await
        .expect("Failed to find record")
        .expect("Record missing");

    assert_eq!(found.app_open_counter, 7);
    assert_eq!(found.first_open_date, Some(at(2)));
    assert_eq!(found.last_open_date, Some(at(9)));
    assert_eq!(found.variant_informations.len(), 1);
    assert_eq!(found.variant_informations[0].variant_id, "variant-b");
}

/// **Test: Update of an unknown id inserts it.**
///
/// **Action:** `update` a record that was never created.
/// **Expected:** `find` returns it.
#[tokio::test]
async fn test_update_inserts_absent() {
    let fx = setup().await;
    let record = PushMessageInformation::submitted_at("app-1", at(3));

    fx.dao.update(&record).await.expect("Failed to update record");

    let found = fx.dao.find(&record.id).await.expect("Failed to query");
    assert_eq!(found.map(|r| r.submit_date), Some(at(3)));
}

/// **Test: Delete removes the record and its metrics.**
///
/// **Setup:** Save a record with a "variant-a" metric.
/// **Action:** `delete(&record)`.
/// **Expected:** `find` returns `None`; the variant listing is empty.
#[tokio::test]
async fn test_delete_existing() {
    let fx = setup().await;
    let record = PushMessageInformation::submitted_at("app-1", at(1))
        .with_variant_information(VariantMetricInformation::new("variant-a", 1));
    fx.dao.create(&record).await.expect("Failed to save record");

    fx.dao.delete(&record).await.expect("Failed to delete record");

    assert!(fx.dao.find(&record.id).await.expect("Failed to query").is_none());
    let by_variant = fx
        .dao
        .find_all(&RecordFilter::variant("variant-a"), SortOrder::Ascending)
        .await
        .expect("Failed to list");
    assert!(by_variant.is_empty());
}

/// **Test: Deleting an id that is not stored.**
///
/// **Action:** `delete` a record that was never created.
/// **Expected:** `StorageError::NotFound` with the id.
#[tokio::test]
async fn test_delete_absent_is_not_found() {
    let fx = setup().await;
    let record = PushMessageInformation::new("app-1");

    let err = fx.dao.delete(&record).await.unwrap_err();

    assert!(matches!(err, StorageError::NotFound(ref id) if *id == record.id));
}

/// **Test: Last three activity, scoped per owner and global.**
///
/// **Setup:** "alice" owns app-1 and app-2, "bob" owns app-3; records spread across them,
/// plus one record for an unregistered app.
/// **Action:** `find_last_three_activity(Some("alice"))`, `(None)`, `(Some("bob"))`.
/// **Expected:** Most recent first, at most three, only visible applications.
#[tokio::test]
async fn test_last_three_activity() {
    let fx = setup().await;
    register_app(&fx.apps, "app-1", "alice").await;
    register_app(&fx.apps, "app-2", "alice").await;
    register_app(&fx.apps, "app-3", "bob").await;

    let a1 = seed(&fx.dao, "app-1", [1, 4]).await;
    let a2 = seed(&fx.dao, "app-2", [2, 6]).await;
    let b = seed(&fx.dao, "app-3", [3, 5]).await;
    seed(&fx.dao, "unregistered", [99]).await;

    let alice = fx
        .dao
        .find_last_three_activity(Some("alice"))
        .await
        .expect("Failed to query");
    assert_eq!(
        ids(&alice),
        vec![a2[1].id.clone(), a1[1].id.clone(), a2[0].id.clone()]
    );

    let global = fx
        .dao
        .find_last_three_activity(None)
        .await
        .expect("Failed to query");
    assert_eq!(
        ids(&global),
        vec![a2[1].id.clone(), b[1].id.clone(), a1[1].id.clone()]
    );

    let bob = fx
        .dao
        .find_last_activity(Some("bob"), 10)
        .await
        .expect("Failed to query");
    assert_eq!(ids(&bob), vec![b[1].id.clone(), b[0].id.clone()]);
}

/// **Test: Count of records for an owner's applications and for all applications.**
///
/// **Setup:** alice: 3 records, bob: 2 records, unregistered app: 1 record.
/// **Action:** `count_for_applications` for alice, bob, carol and `None`.
/// **Expected:** 3, 2, 0 and 5.
#[tokio::test]
async fn test_count_for_applications() {
    let fx = setup().await;
    register_app(&fx.apps, "app-1", "alice").await;
    register_app(&fx.apps, "app-2", "bob").await;
    seed(&fx.dao, "app-1", 0..3).await;
    seed(&fx.dao, "app-2", 0..2).await;
    seed(&fx.dao, "unregistered", [0]).await;

    let count = |owner: Option<&'static str>| {
        let dao = fx.dao.clone();
        async move { dao.count_for_applications(owner).await.expect("Failed to count") }
    };

    assert_eq!(count(Some("alice")).await, 3);
    assert_eq!(count(Some("bob")).await, 2);
    assert_eq!(count(Some("carol")).await, 0);
    assert_eq!(count(None).await, 5);
}

/// **Test: Variant ids with failed deliveries.**
///
/// **Setup:** alice owns variant-a and variant-b, bob owns variant-c; failures on a (twice)
/// and c, only successes on b.
/// **Action:** `find_variant_ids_with_warnings` for alice and `None`.
/// **Expected:** `["variant-a"]` and `["variant-a", "variant-c"]`.
#[tokio::test]
async fn test_variant_ids_with_warnings() {
    let fx = setup().await;
    register_variant(&fx.apps, "variant-a", "app-1", "alice").await;
    register_variant(&fx.apps, "variant-b", "app-1", "alice").await;
    register_variant(&fx.apps, "variant-c", "app-2", "bob").await;

    let records = [
        PushMessageInformation::submitted_at("app-1", at(1))
            .with_variant_information(VariantMetricInformation::new("variant-a", 1).failed("timeout"))
            .with_variant_information(VariantMetricInformation::new("variant-b", 1).delivered()),
        PushMessageInformation::submitted_at("app-1", at(2))
            .with_variant_information(VariantMetricInformation::new("variant-a", 1).failed("timeout"))
            .with_variant_information(VariantMetricInformation::new("variant-b", 1)),
        PushMessageInformation::submitted_at("app-2", at(3))
            .with_variant_information(VariantMetricInformation::new("variant-c", 1).failed("invalid")),
    ];
    for record in &records {
        fx.dao.create(record).await.expect("Failed to save record");
    }

    let alice = fx
        .dao
        .find_variant_ids_with_warnings(Some("alice"))
        .await
        .expect("Failed to query");
    assert_eq!(alice, vec!["variant-a".to_string()]);

    let global = fx
        .dao
        .find_variant_ids_with_warnings(None)
        .await
        .expect("Failed to query");
    assert_eq!(global, vec!["variant-a".to_string(), "variant-c".to_string()]);
}

/// **Test: Retention cleanup removes everything strictly older than the threshold.**
///
/// **Setup:** Records at minutes 0..6, some with metrics.
/// **Action:** `delete_older_than(at(3))`, then again.
/// **Expected:** 3 removed first, 0 the second time; remaining records are minutes 3..6.
#[tokio::test]
async fn test_delete_older_than() {
    let fx = setup().await;
    for minute in 0..6 {
        let record = PushMessageInformation::submitted_at("app-1", at(minute))
            .with_variant_information(VariantMetricInformation::new("variant-a", 1));
        fx.dao.create(&record).await.expect("Failed to save record");
    }

    let removed = fx
        .dao
        .delete_older_than(at(3))
        .await
        .expect("Failed to delete");
    assert_eq!(removed, 3);

    let remaining = fx
        .dao
        .find_all(&RecordFilter::push_application("app-1"), SortOrder::Ascending)
        .await
        .expect("Failed to list");
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|r| r.submit_date >= at(3)));

    let by_variant = fx
        .dao
        .find_page(&RecordFilter::variant("variant-a"), SortOrder::Ascending, 0, 10)
        .await
        .expect("Failed to list");
    assert_eq!(by_variant.total_count, 3);

    let removed_again = fx
        .dao
        .delete_older_than(at(3))
        .await
        .expect("Failed to delete");
    assert_eq!(removed_again, 0);
}

/// **Test: Application rows round-trip through PushApplicationRepository.**
///
/// **Setup:** Save app-1 for alice, then again for bob; save two variants.
/// **Action:** `find_application`, `find_variants_for_application`.
/// **Expected:** Latest owner wins; variants listed by id.
#[tokio::test]
async fn test_application_rows() {
    let fx = setup().await;
    register_app(&fx.apps, "app-1", "alice").await;
    register_app(&fx.apps, "app-1", "bob").await;
    register_variant(&fx.apps, "variant-b", "app-1", "bob").await;
    register_variant(&fx.apps, "variant-a", "app-1", "bob").await;

    let app = fx
        .apps
        .find_application("app-1")
        .await
        .expect("Failed to query")
        .expect("Application missing");
    assert_eq!(app.developer, "bob");

    let variants = fx
        .apps
        .find_variants_for_application("app-1")
        .await
        .expect("Failed to query");
    let variant_ids: Vec<&str> = variants.iter().map(|v| v.variant_id.as_str()).collect();
    assert_eq!(variant_ids, vec!["variant-a", "variant-b"]);
}
