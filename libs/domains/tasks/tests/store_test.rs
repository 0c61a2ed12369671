//! TaskStore tests against a migrated SQLite database
//!
//! These exercise the SQL implementation end to end: id assignment,
//! merge semantics, the completed/completed_at pairing and both orderings.

use chrono::NaiveDate;
use database::sql::{self, SqlConfig};
use domain_tasks::*;
use serde_json::json;
use std::time::Duration;
use test_utils::{TestDataBuilder, TestDatabase, assertions};

async fn setup() -> (TestDatabase, TaskStore) {
    let db = TestDatabase::new().await;
    let store = TaskStore::new(db.connection());
    (db, store)
}

fn input(builder: &TestDataBuilder, suffix: &str) -> CreateTask {
    CreateTask {
        name: builder.name("task", suffix),
        deadline: builder.deadline(14),
        description: None,
    }
}

fn completed(value: bool) -> UpdateTask {
    UpdateTask {
        completed: Some(value),
        ..Default::default()
    }
}

fn ids(tasks: &[Task]) -> Vec<i32> {
    tasks.iter().map(|t| t.id).collect()
}

// Keeps consecutive timestamps strictly apart
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn test_create_assigns_increasing_ids_and_defaults() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("create_defaults");

    let mut last_id = 0;
    for i in 0..5 {
        let task = store.create(input(&builder, &i.to_string())).await.unwrap();

        assert!(task.id > last_id);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        last_id = task.id;
    }
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("round_trip");

    let created = store
        .create(CreateTask {
            description: Some("with a description".to_string()),
            ..input(&builder, "main")
        })
        .await
        .unwrap();

    let fetched = assertions::assert_some(store.get_by_id(created.id).await.unwrap(), "get");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("no_reuse");

    store.create(input(&builder, "a")).await.unwrap();
    let last = store.create(input(&builder, "b")).await.unwrap();
    assert!(store.delete(last.id).await.unwrap());

    let next = store.create(input(&builder, "c")).await.unwrap();
    assert!(next.id > last.id, "id {} was handed out again", last.id);
}

#[tokio::test]
async fn test_completing_stamps_completed_at() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("complete");
    let task = store.create(input(&builder, "main")).await.unwrap();

    let before = models::now();
    let done = store.update(task.id, completed(true)).await.unwrap().unwrap();
    let after = models::now();

    assert!(done.completed);
    let stamp = assertions::assert_some(done.completed_at, "completed_at");
    assertions::assert_between(stamp, before, after, "completed_at");

    let stored = store.get_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored, done);
}

#[tokio::test]
async fn test_completing_again_restamps() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("restamp");
    let task = store.create(input(&builder, "main")).await.unwrap();

    let first = store.update(task.id, completed(true)).await.unwrap().unwrap();
    tick().await;
    let second = store.update(task.id, completed(true)).await.unwrap().unwrap();

    assert!(second.completed);
    assert!(second.completed_at > first.completed_at);
}

#[tokio::test]
async fn test_uncompleting_clears_completed_at() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("uncomplete");
    let task = store.create(input(&builder, "main")).await.unwrap();

    store.update(task.id, completed(true)).await.unwrap();
    let reopened = store.update(task.id, completed(false)).await.unwrap().unwrap();

    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());

    // Setting false on an open task is harmless
    let again = store.update(task.id, completed(false)).await.unwrap().unwrap();
    assert_eq!(again, reopened);
}

#[tokio::test]
async fn test_completed_at_tracks_completed_through_transitions() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("pairing");
    let task = store.create(input(&builder, "main")).await.unwrap();

    for value in [true, false, true, true, false] {
        store.update(task.id, completed(value)).await.unwrap();

        for t in store.list(TaskFilter::default()).await.unwrap() {
            assert_eq!(t.completed, t.completed_at.is_some(), "task {}", t.id);
        }
    }
}

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("merge");
    let task = store.create(input(&builder, "main")).await.unwrap();

    let new_deadline = builder.deadline(30);
    let updated = store
        .update(
            task.id,
            UpdateTask {
                deadline: Some(new_deadline),
                description: Some("added later".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.deadline, new_deadline);
    assert_eq!(updated.description.as_deref(), Some("added later"));
    assert_eq!(updated.name, task.name);
    assert_eq!(updated.created_at, task.created_at);
    assert_eq!(updated.completed, task.completed);
    assert_eq!(updated.completed_at, task.completed_at);
}

#[tokio::test]
async fn test_empty_and_null_patches_are_no_ops() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("no_op");
    let task = store
        .create(CreateTask {
            description: Some("keep me".to_string()),
            ..input(&builder, "main")
        })
        .await
        .unwrap();

    let unchanged = store
        .update(task.id, UpdateTask::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, task);

    let nulls: UpdateTask =
        serde_json::from_value(json!({"name": null, "description": null})).unwrap();
    let unchanged = store.update(task.id, nulls).await.unwrap().unwrap();
    assert_eq!(unchanged, task);
}

#[tokio::test]
async fn test_update_missing_task_writes_nothing() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("update_missing");
    store.create(input(&builder, "main")).await.unwrap();

    let before = store.list(TaskFilter::default()).await.unwrap();
    let result = store.update(999, completed(true)).await.unwrap();
    let after = store.list(TaskFilter::default()).await.unwrap();

    assert!(result.is_none());
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_delete_missing_task_returns_false() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("delete_missing");
    let task = store.create(input(&builder, "main")).await.unwrap();

    assert!(!store.delete(task.id + 1).await.unwrap());
    assert!(store.delete(task.id).await.unwrap());
    assert!(!store.delete(task.id).await.unwrap());
    assert!(store.get_by_id(task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_orders_newest_first_and_filters() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("list");

    let a = store.create(input(&builder, "a")).await.unwrap();
    tick().await;
    let b = store.create(input(&builder, "b")).await.unwrap();
    tick().await;
    let c = store.create(input(&builder, "c")).await.unwrap();
    store.update(b.id, completed(true)).await.unwrap();

    let all = store.list(TaskFilter::default()).await.unwrap();
    assert_eq!(ids(&all), vec![c.id, b.id, a.id]);

    let open = store
        .list(TaskFilter {
            completed: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(ids(&open), vec![c.id, a.id]);

    let done = store
        .list(TaskFilter {
            completed: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(ids(&done), vec![b.id]);
}

#[tokio::test]
async fn test_list_completed_orders_by_completion_time() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("list_completed");

    let a = store.create(input(&builder, "a")).await.unwrap();
    tick().await;
    let b = store.create(input(&builder, "b")).await.unwrap();
    tick().await;
    let c = store.create(input(&builder, "c")).await.unwrap();

    // Completion order differs from creation order: c, then a
    store.update(c.id, completed(true)).await.unwrap();
    tick().await;
    store.update(a.id, completed(true)).await.unwrap();

    let by_creation = store
        .list(TaskFilter {
            completed: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(ids(&by_creation), vec![c.id, a.id]);

    let by_completion = store.list_completed().await.unwrap();
    assert_eq!(ids(&by_completion), vec![a.id, c.id]);
    assert!(!ids(&by_completion).contains(&b.id));
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let (_db, store) = setup().await;

    assert!(store.list(TaskFilter::default()).await.unwrap().is_empty());
    assert!(store.list_completed().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let (_db, store) = setup().await;
    let builder = TestDataBuilder::from_test_name("concurrent");

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            let input = input(&builder, &i.to_string());
            tokio::spawn(async move { store.create(input).await })
        })
        .collect();

    let mut seen = Vec::new();
    for handle in handles {
        seen.push(handle.await.unwrap().unwrap().id);
    }
    seen.sort_unstable();
    seen.dedup();

    assert_eq!(seen.len(), 10);
}

// Multi-connection pool over a real file, unlike the pinned in-memory database
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_writes_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("tasks.db").display());
    let db = sql::connect_from_config(SqlConfig::new(url)).await.unwrap();
    sql::run_migrations::<migration::Migrator>(&db, "store_test")
        .await
        .unwrap();

    let store = TaskStore::new(db.clone());
    let builder = TestDataBuilder::from_test_name("file_concurrency");
    let task_id = store.create(input(&builder, "shared")).await.unwrap().id;

    let updates = (0..40).map(|i| {
        let store = store.clone();
        let patch = UpdateTask {
            name: Some(format!("renamed-{i}")),
            completed: Some(i % 2 == 0),
            ..Default::default()
        };
        tokio::spawn(async move { store.update(task_id, patch).await.map(|_| ()) })
    });
    let creates = (0..20).map(|i| {
        let store = store.clone();
        let input = input(&builder, &format!("extra-{i}"));
        tokio::spawn(async move { store.create(input).await.map(|_| ()) })
    });
    let handles: Vec<_> = updates.chain(creates).collect();

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(e) = handle.await.unwrap() {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "{} writes failed: {:?}", failures.len(), failures);

    let all = store.list(TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 21);
    for t in &all {
        assert_eq!(t.completed, t.completed_at.is_some(), "task {}", t.id);
    }

    let shared = store.get_by_id(task_id).await.unwrap().unwrap();
    assert!(shared.name.starts_with("renamed-"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_write_spec_scenario() {
    let (_db, store) = setup().await;

    let a = store
        .create(CreateTask {
            name: "Write spec".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(a.id, 1);
    assert!(!a.completed);

    let b = store
        .create(CreateTask {
            name: "Review spec".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(b.id, 2);

    let done = store.update(1, completed(true)).await.unwrap().unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    let listed = store
        .list(TaskFilter {
            completed: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(listed, vec![done]);

    assert!(store.delete(2).await.unwrap());
    assert!(store.get_by_id(2).await.unwrap().is_none());
}
