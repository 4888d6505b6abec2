//! End-to-end pipeline scenarios: live write, overwrite, sweep, and the
//! direct-write capacity guard, composed the way the ingestion and
//! reporting handlers use them.

use rumbo_core::{PackageId, SubjectId};
use rumbo_storage::{InMemoryCacheBackend, InMemoryLocationStore, LiveLocationCache, LocationHistoryStore};
use rumbo_tracking::{
    last_known, recent_history, record_direct, run_sweep, update_live, ArchiveSweepConfig,
    HistoryQuery, RecordLocationRequest, SweepOutcome,
};

fn request(subject_id: i64, latitude: f64, longitude: f64) -> RecordLocationRequest {
    RecordLocationRequest {
        subject_id: Some(subject_id),
        package_id: Some(1),
        latitude: Some(latitude),
        longitude: Some(longitude),
    }
}

#[tokio::test]
async fn overwrite_then_sweep_migrates_the_latest_position() {
    let cache = LiveLocationCache::new(InMemoryCacheBackend::new());
    let store = InMemoryLocationStore::new();

    // Subject 23 reports twice; the second write fully replaces the first.
    update_live(&cache, &request(23, 4.65, -74.06)).await.unwrap();
    update_live(&cache, &request(23, 4.6505, -74.0635))
        .await
        .unwrap();

    let reading = cache.get(SubjectId(23)).await.unwrap().unwrap();
    assert_eq!(reading.location.latitude, 4.6505);
    assert_eq!(reading.location.longitude, -74.0635);
    assert_eq!(reading.location.package_id, Some(PackageId(1)));

    // The sweep sees exactly one entry and persists the latest value.
    let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
    let SweepOutcome::Completed(report) = outcome else {
        panic!("expected completed run");
    };
    assert_eq!(report.migrated, 1);
    assert_eq!(report.errors, 0);

    let persisted = last_known(&store, SubjectId(23)).await.unwrap().unwrap();
    assert_eq!(persisted.location.latitude, 4.6505);
    assert_eq!(
        persisted.location.created_at,
        reading.location.captured_at
    );
}

#[tokio::test]
async fn direct_writes_stay_capped_and_readable() {
    let store = InMemoryLocationStore::new();

    // Subject 7 accumulates 9 records.
    for i in 0..9 {
        record_direct(&store, &request(7, 4.60 + f64::from(i) / 100.0, -74.06))
            .await
            .unwrap();
    }

    // The tenth write lands without evicting anything.
    record_direct(&store, &request(7, 4.70, -74.06)).await.unwrap();
    assert_eq!(store.count_for_subject(SubjectId(7)).await.unwrap(), 10);

    // The eleventh evicts exactly the oldest; the count holds at 10.
    record_direct(&store, &request(7, 4.71, -74.06)).await.unwrap();
    assert_eq!(store.count_for_subject(SubjectId(7)).await.unwrap(), 10);

    let views = recent_history(
        &store,
        SubjectId(7),
        HistoryQuery {
            limit: 100,
            window_hours: 24,
        },
    )
    .await
    .unwrap();
    assert_eq!(views.len(), 10);
    // Newest first, and the very first write (4.60) is gone.
    assert_eq!(views[0].location.latitude, 4.71);
    assert!(views.iter().all(|v| v.location.latitude != 4.60));
}

#[tokio::test]
async fn expired_live_entries_are_invisible_to_the_next_sweep() {
    let cache = LiveLocationCache::new(InMemoryCacheBackend::new());
    let store = InMemoryLocationStore::new();

    update_live(&cache, &request(23, 4.65, -74.06)).await.unwrap();
    let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
    assert!(matches!(outcome, SweepOutcome::Completed(_)));

    // The sweep does not delete the entry; the TTL does.
    assert!(cache.get(SubjectId(23)).await.unwrap().is_some());
    cache.backend().advance(std::time::Duration::from_secs(601));
    assert!(cache.get(SubjectId(23)).await.unwrap().is_none());

    let outcome = run_sweep(&cache, &store, &ArchiveSweepConfig::default()).await;
    let SweepOutcome::Completed(report) = outcome else {
        panic!("expected completed run");
    };
    assert_eq!(report.processed, 0);
    assert_eq!(store.count_for_subject(SubjectId(23)).await.unwrap(), 1);
}
