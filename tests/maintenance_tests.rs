use listing_maint::{
    Category, DocumentStore, InMemoryDocumentStore, MaintError, Maintainer, MaintenanceConfig,
    Outcome, StoreError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn numbered_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("listing-{:04}", i)).collect()
}

fn listing(title: &str, category: &str) -> listing_maint::Document {
    json!({"title": title, "category": category})
        .as_object()
        .cloned()
        .unwrap()
}

// ==================== Cleanup ====================

#[tokio::test]
async fn test_cleanup_deletes_everything_not_kept() {
    let store = InMemoryDocumentStore::with_ids(["a", "b", "c", "d", "e"]);
    let config = MaintenanceConfig::default()
        .max_batch_size(2)
        .keep_list(["b", "d"]);
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.cleanup().await.unwrap();

    assert_eq!(report.plan.total, 5);
    assert_eq!(report.plan.reconciliation.delete_ids, vec!["a", "c", "e"]);
    assert!(report.plan.absent_keep_ids.is_empty());

    let run = report.run.as_ref().unwrap();
    assert_eq!(run.total_chunks, 2);
    assert_eq!(run.committed_chunks, 2);
    assert_eq!(run.mutated_count, 3);
    assert!(!report.halted());

    let verification = report.verification.unwrap();
    assert_eq!(verification.expected, 2);
    assert_eq!(verification.observed, 2);
    assert_eq!(verification.outcome, Outcome::Match);

    assert_eq!(maintainer.store().get_all_ids().await.unwrap(), vec!["b", "d"]);
}

#[tokio::test]
async fn test_cleanup_requires_keep_list_before_touching_store() {
    let store = InMemoryDocumentStore::with_ids(["a"]);
    store.set_unreachable(true).unwrap();
    let maintainer = Maintainer::new(store, MaintenanceConfig::default()).unwrap();

    let err = maintainer.cleanup().await.unwrap_err();

    assert!(err.is_config());
    assert_eq!(maintainer.store().commit_attempts(), 0);
}

#[tokio::test]
async fn test_cleanup_with_nothing_to_delete_skips_executor() {
    let store = InMemoryDocumentStore::with_ids(["a", "b"]);
    let config = MaintenanceConfig::default().keep_list(["a", "b", "z"]);
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.cleanup().await.unwrap();

    assert!(report.run.is_none());
    assert!(report.verification.is_none());
    assert_eq!(report.plan.absent_keep_ids, vec!["z"]);
    assert_eq!(maintainer.store().commit_attempts(), 0);
}

#[tokio::test]
async fn test_cleanup_dry_run_plans_only() {
    let store = InMemoryDocumentStore::with_ids(["a", "b", "c"]);
    let config = MaintenanceConfig::default().keep_list(["b"]).dry_run(true);
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.cleanup().await.unwrap();

    assert_eq!(report.plan.reconciliation.delete_ids, vec!["a", "c"]);
    assert!(report.run.is_none());
    assert_eq!(maintainer.store().count().await.unwrap(), 3);
    assert_eq!(maintainer.store().commit_attempts(), 0);
}

#[tokio::test]
async fn test_cleanup_halts_and_verifies_committed_prefix() {
    let store = InMemoryDocumentStore::with_ids(numbered_ids(1200));
    store.fail_commit_at(1).unwrap();
    let config = MaintenanceConfig::default().keep_list(["not-in-store"]);
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.cleanup().await.unwrap();

    assert!(report.halted());
    let run = report.run.as_ref().unwrap();
    assert_eq!(run.committed_chunks, 1);
    assert_eq!(run.mutated_count, 500);
    assert_eq!(run.failed_chunk, Some(1));
    assert_eq!(run.resume_offset(500), Some(500));

    let verification = report.verification.unwrap();
    assert_eq!(verification.expected, 700);
    assert!(verification.outcome.is_match());
}

#[tokio::test]
async fn test_failed_recount_keeps_complete_run_result() {
    let store = Arc::new(InMemoryDocumentStore::with_ids(["a", "b", "c", "d", "e"]));
    let config = MaintenanceConfig::default()
        .max_batch_size(2)
        .keep_list(["b", "d"]);
    let reads_down_after_last_commit = {
        let store = store.clone();
        move |committed: usize, total: usize| {
            if committed == total {
                store.fail_reads(true).unwrap();
            }
        }
    };
    let maintainer = Maintainer::new(store.clone(), config)
        .unwrap()
        .with_progress(Arc::new(reads_down_after_last_commit));

    let report = maintainer.cleanup().await.unwrap();

    let run = report.run.as_ref().unwrap();
    assert!(run.is_complete());
    assert_eq!(run.mutated_count, 3);
    assert!(!report.halted());
    assert!(report.verification.is_none());

    store.fail_reads(false).unwrap();
    assert_eq!(store.get_all_ids().await.unwrap(), vec!["b", "d"]);
}

#[tokio::test]
async fn test_abort_persists_until_reset() {
    let store = InMemoryDocumentStore::with_ids(["a", "b", "c"]);
    let config = MaintenanceConfig::default().keep_list(["a"]);
    let maintainer = Maintainer::new(store, config).unwrap();
    let abort = maintainer.abort_handle();
    abort.abort();

    let first = maintainer.cleanup().await.unwrap();
    assert!(first.run.unwrap().aborted);
    let second = maintainer.cleanup().await.unwrap();
    assert!(second.run.unwrap().aborted);
    assert_eq!(maintainer.store().commit_attempts(), 0);

    abort.reset();
    let third = maintainer.cleanup().await.unwrap();
    assert!(third.run.unwrap().is_complete());
    assert_eq!(maintainer.store().get_all_ids().await.unwrap(), vec!["a"]);
}

#[tokio::test]
async fn test_cleanup_twice_is_idempotent() {
    let store = InMemoryDocumentStore::with_ids(numbered_ids(12));
    let config = MaintenanceConfig::default()
        .max_batch_size(5)
        .keep_list(["listing-0002", "listing-0009"]);
    let maintainer = Maintainer::new(store, config).unwrap();

    let first = maintainer.cleanup().await.unwrap();
    assert_eq!(first.run.unwrap().mutated_count, 10);

    let second = maintainer.cleanup().await.unwrap();
    assert!(second.run.is_none());
    assert_eq!(
        second.plan.reconciliation.keep_ids,
        vec!["listing-0002", "listing-0009"]
    );
}

#[tokio::test]
async fn test_unreachable_store_is_store_error() {
    let store = InMemoryDocumentStore::with_ids(["a"]);
    store.set_unreachable(true).unwrap();
    let config = MaintenanceConfig::default().keep_list(["a"]);
    let maintainer = Maintainer::new(store, config).unwrap();

    let err = maintainer.cleanup().await.unwrap_err();

    assert!(matches!(
        err,
        MaintError::Store(StoreError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_slow_commit_surfaces_as_timeout() {
    let store = InMemoryDocumentStore::with_ids(["a", "b", "c"])
        .commit_delay(Duration::from_millis(200));
    let config = MaintenanceConfig::default()
        .keep_list(["a"])
        .commit_timeout(Duration::from_millis(20));
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.cleanup().await.unwrap();

    let run = report.run.unwrap();
    assert_eq!(run.failed_chunk, Some(0));
    assert_eq!(
        run.failure,
        Some(StoreError::Timeout(Duration::from_millis(20)))
    );
    assert_eq!(maintainer.store().count().await.unwrap(), 3);
}

// ==================== Seeding ====================

#[tokio::test]
async fn test_seed_replaces_collection() {
    let store = InMemoryDocumentStore::with_ids(["old-1", "old-2", "old-3"]);
    let config = MaintenanceConfig::default()
        .categories(vec![Category::Vehicles, Category::Apparel])
        .count_per_category(4)
        .max_batch_size(5)
        .rng_seed(7);
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.seed().await.unwrap();

    assert_eq!(report.cleared, 3);
    assert_eq!(report.generated_total(), 8);
    assert_eq!(report.generated.get(&Category::Vehicles), Some(&4));
    assert_eq!(report.generated.get(&Category::Apparel), Some(&4));

    let run = report.run.as_ref().unwrap();
    assert_eq!(run.total_chunks, 3);
    assert_eq!(run.mutated_count, 11);
    assert!(report.verification.unwrap().outcome.is_match());

    let store = maintainer.store();
    assert_eq!(store.count().await.unwrap(), 8);
    assert!(store.get("old-1").await.is_none());
    assert_eq!(store.commit_sizes().unwrap(), vec![5, 5, 1]);

    let census = maintainer.census().await.unwrap();
    assert_eq!(census.total, 8);
    assert_eq!(census.per_category.get("vehicles"), Some(&4));
    assert_eq!(census.per_category.get("apparel"), Some(&4));
}

#[tokio::test]
async fn test_seed_documents_have_base_fields() {
    let config = MaintenanceConfig::default()
        .categories(vec![Category::Electronics])
        .count_per_category(2)
        .rng_seed(11);
    let maintainer = Maintainer::new(InMemoryDocumentStore::new(), config).unwrap();

    maintainer.seed().await.unwrap();

    let store = maintainer.store();
    for id in store.get_all_ids().await.unwrap() {
        let doc = store.get(&id).await.unwrap();
        assert_eq!(doc.get("id"), Some(&json!(id)));
        assert_eq!(doc.get("category"), Some(&json!("electronics")));
        assert_eq!(doc.get("isActive"), Some(&json!(true)));
        assert_eq!(doc["images"].as_array().unwrap().len(), 3);
        assert!(doc["categoryFields"].is_object());
    }
}

#[tokio::test]
async fn test_seed_is_reproducible_with_rng_seed() {
    let config = MaintenanceConfig::default().count_per_category(3).rng_seed(42);

    let first = Maintainer::new(InMemoryDocumentStore::new(), config.clone()).unwrap();
    let second = Maintainer::new(InMemoryDocumentStore::new(), config).unwrap();
    first.seed().await.unwrap();
    second.seed().await.unwrap();

    let first_ids = first.store().get_all_ids().await.unwrap();
    assert_eq!(first_ids.len(), 12);
    assert_eq!(first_ids, second.store().get_all_ids().await.unwrap());
}

#[tokio::test]
async fn test_seed_config_errors_leave_store_untouched() {
    let store = InMemoryDocumentStore::with_ids(["keep-me"]);
    let config = MaintenanceConfig::default().count_per_category(0);
    let maintainer = Maintainer::new(store, config).unwrap();

    let err = maintainer.seed().await.unwrap_err();

    assert!(err.is_config());
    assert_eq!(maintainer.store().count().await.unwrap(), 1);
    assert_eq!(maintainer.store().commit_attempts(), 0);
}

#[tokio::test]
async fn test_seed_dry_run() {
    let store = InMemoryDocumentStore::with_ids(["x", "y"]);
    let config = MaintenanceConfig::default()
        .categories(vec![Category::PropertyRentals])
        .count_per_category(2)
        .dry_run(true);
    let maintainer = Maintainer::new(store, config).unwrap();

    let report = maintainer.seed().await.unwrap();

    assert_eq!(report.cleared, 2);
    assert_eq!(report.generated_total(), 2);
    assert!(report.run.is_none());
    assert_eq!(maintainer.store().get_all_ids().await.unwrap(), vec!["x", "y"]);
}

// ==================== Census ====================

#[tokio::test]
async fn test_census_reports_preserved_listings() {
    let store = InMemoryDocumentStore::with_documents([
        ("a".to_string(), listing("Road bike", "vehicles")),
        ("b".to_string(), listing("Loft", "property-rentals")),
        ("c".to_string(), listing("Tablet", "electronics")),
        ("d".to_string(), listing("Coupe", "vehicles")),
        ("e".to_string(), listing_maint::Document::new()),
    ]);
    let config = MaintenanceConfig::default().keep_list(["d", "e"]);
    let maintainer = Maintainer::new(store, config).unwrap();

    let census = maintainer.census().await.unwrap();

    assert_eq!(census.total, 5);
    assert_eq!(census.per_category.get("vehicles"), Some(&2));
    assert_eq!(census.per_category.get("unknown"), Some(&1));
    assert_eq!(census.preserved.len(), 2);
    assert_eq!(census.preserved[0].title, "Coupe");
    assert_eq!(census.preserved[1].title, "No title");
}
