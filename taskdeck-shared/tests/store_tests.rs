//! Task store and loader tests against the in-memory store

use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use taskdeck_shared::loader::{self, LoadError};
use taskdeck_shared::models::task::{CreateTask, Priority, Task, TaskFilter, UpdateTask};
use taskdeck_shared::stats::{DueLabel, StatsError, DEFAULT_HORIZON_DAYS};
use taskdeck_shared::store::{MemoryTaskStore, TaskStore};
use uuid::Uuid;

fn new_task(user_id: Uuid, title: &str, priority: Priority, due_in: Duration) -> CreateTask {
    CreateTask {
        user_id,
        title: title.to_string(),
        description: format!("{} description", title),
        priority,
        due_date: Utc::now() + due_in,
        due_time: None,
    }
}

#[tokio::test]
async fn test_create_and_get() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();

    let task = store
        .create_task(new_task(user, "Buy milk", Priority::Low, Duration::days(1)))
        .await
        .unwrap();

    assert!(!task.completed);
    assert!(task.completed_at.is_none());
    assert_eq!(task.created_at, task.updated_at);

    let fetched = store.get_task(user, task.id).await.unwrap();
    assert_eq!(fetched, Some(task));
}

#[tokio::test]
async fn test_queries_are_scoped_to_owner() {
    let store = MemoryTaskStore::new();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let task = store
        .create_task(new_task(owner, "Private", Priority::High, Duration::days(1)))
        .await
        .unwrap();

    assert!(store.get_task(stranger, task.id).await.unwrap().is_none());
    assert!(store.list_tasks(stranger, TaskFilter::all()).await.unwrap().is_empty());
    assert!(store
        .update_task(stranger, task.id, UpdateTask { title: Some("Mine".into()), ..Default::default() })
        .await
        .unwrap()
        .is_none());
    assert!(store.complete_task(stranger, task.id).await.unwrap().is_none());

    let still = store.get_task(owner, task.id).await.unwrap().unwrap();
    assert_eq!(still.title, "Private");
    assert!(!still.completed);
}

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();

    let first = store
        .create_task(new_task(user, "First", Priority::Low, Duration::days(3)))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store
        .create_task(new_task(user, "Second", Priority::Low, Duration::days(1)))
        .await
        .unwrap();
    store.complete_task(user, first.id).await.unwrap();

    let all = store.list_tasks(user, TaskFilter::all()).await.unwrap();
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![second.id, first.id]);

    let pending = store.list_tasks(user, TaskFilter::pending()).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    let completed = store.list_tasks(user, TaskFilter::completed()).await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, first.id);
}

#[tokio::test]
async fn test_partial_update_bumps_updated_at() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();
    let task = store
        .create_task(new_task(user, "Draft", Priority::Medium, Duration::days(2)))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let updated = store
        .update_task(
            user,
            task.id,
            UpdateTask {
                priority: Some(Priority::High),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.description, task.description);
    assert_eq!(updated.due_date, task.due_date);
    assert!(updated.updated_at > task.updated_at);
    assert_eq!(updated.created_at, task.created_at);
}

#[tokio::test]
async fn test_completion_is_one_way() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();
    let task = store
        .create_task(new_task(user, "Once", Priority::Medium, Duration::days(2)))
        .await
        .unwrap();

    let done = store.complete_task(user, task.id).await.unwrap().unwrap();
    assert!(done.completed);
    assert_eq!(done.completed_at, Some(done.updated_at));

    assert!(store.complete_task(user, task.id).await.unwrap().is_none());
    assert!(store.complete_task(user, Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_dashboard_and_report() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();

    store
        .create_task(new_task(user, "Soon", Priority::High, Duration::days(2)))
        .await
        .unwrap();
    store
        .create_task(new_task(user, "Late", Priority::Low, Duration::days(-2)))
        .await
        .unwrap();
    let done = store
        .create_task(new_task(user, "Done", Priority::Medium, Duration::days(1)))
        .await
        .unwrap();
    store.complete_task(user, done.id).await.unwrap();

    let now = Utc::now();
    let dashboard = loader::load_dashboard(&store, user, now, DEFAULT_HORIZON_DAYS)
        .await
        .unwrap();
    assert_eq!(dashboard.pending, 2);
    assert_eq!(dashboard.completed, 1);
    assert_eq!(dashboard.upcoming, 2);

    let report = loader::load_report(&store, user, now).await.unwrap();
    assert_eq!(report.total_tasks, 3);
    assert_eq!(report.overdue_tasks, 1);
    assert_eq!(report.completion_rate, 33);
    assert_eq!(report.high_priority, 1);
}

#[tokio::test]
async fn test_load_report_surfaces_data_errors() {
    let user = Uuid::new_v4();
    let now = Utc::now();
    let bad = Task {
        id: Uuid::new_v4(),
        user_id: user,
        title: "Bad".to_string(),
        description: "Completed before created".to_string(),
        priority: Priority::Low,
        due_date: now,
        due_time: None,
        completed: true,
        completed_at: Some(now - Duration::days(2)),
        created_at: now - Duration::days(1),
        updated_at: now,
    };
    let id = bad.id;
    let store = MemoryTaskStore::with_tasks([bad]);

    let err = loader::load_report(&store, user, now).await.unwrap_err();
    assert!(matches!(
        err,
        LoadError::Stats(StatsError::NegativeCompletionTime { task_id }) if task_id == id
    ));

    // Other views are unaffected by the bad record
    let dashboard = loader::load_dashboard(&store, user, now, DEFAULT_HORIZON_DAYS)
        .await
        .unwrap();
    assert_eq!(dashboard.completed, 1);
}

#[tokio::test]
async fn test_load_calendar_and_day_in_local_time() {
    let user = Uuid::new_v4();
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 1, 30, 0).unwrap();
    let task = Task {
        id: Uuid::new_v4(),
        user_id: user,
        title: "Late night".to_string(),
        description: "Crosses midnight".to_string(),
        priority: Priority::High,
        due_date: due,
        due_time: None,
        completed: false,
        completed_at: None,
        created_at: due - Duration::days(3),
        updated_at: due - Duration::days(3),
    };
    let other_user_task = Task {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        ..task.clone()
    };
    let store = MemoryTaskStore::with_tasks([task.clone(), other_user_task]);

    let utc_minus_3 = FixedOffset::west_opt(3 * 3600).unwrap();

    let marks = loader::load_calendar(&store, user, &utc_minus_3).await.unwrap();
    assert_eq!(marks.len(), 1);
    assert!(marks.contains_key("2025-05-31"));

    let day = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
    let tasks = loader::load_day(&store, user, day, &utc_minus_3).await.unwrap();
    assert_eq!(tasks, vec![task]);

    let utc_day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    assert!(loader::load_day(&store, user, utc_day, &utc_minus_3)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_load_upcoming_and_recent() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();

    for (title, days) in [("Far", 20), ("Next week", 5), ("Tomorrow", 1), ("Yesterday", -1)] {
        store
            .create_task(new_task(user, title, Priority::Medium, Duration::days(days)))
            .await
            .unwrap();
    }

    let upcoming = loader::load_upcoming(&store, user, Utc::now(), DEFAULT_HORIZON_DAYS)
        .await
        .unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|u| u.task.title.as_str()).collect();
    assert_eq!(titles, vec!["Yesterday", "Tomorrow", "Next week"]);
    assert_eq!(upcoming[0].due, DueLabel::Overdue);

    let recent = loader::load_recent(&store, user, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
}

#[tokio::test]
async fn test_load_task_list_orders_per_view() {
    let store = MemoryTaskStore::new();
    let user = Uuid::new_v4();

    let later = store
        .create_task(new_task(user, "Later", Priority::Low, Duration::days(4)))
        .await
        .unwrap();
    let sooner = store
        .create_task(new_task(user, "Sooner", Priority::Low, Duration::days(1)))
        .await
        .unwrap();
    let a = store
        .create_task(new_task(user, "A", Priority::Low, Duration::days(1)))
        .await
        .unwrap();
    let b = store
        .create_task(new_task(user, "B", Priority::Low, Duration::days(1)))
        .await
        .unwrap();

    store.complete_task(user, a.id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.complete_task(user, b.id).await.unwrap();

    let pending = loader::load_task_list(&store, user, TaskFilter::pending()).await.unwrap();
    assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![sooner.id, later.id]);

    let completed = loader::load_task_list(&store, user, TaskFilter::completed()).await.unwrap();
    assert_eq!(completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b.id, a.id]);

    let all = loader::load_task_list(&store, user, TaskFilter::all()).await.unwrap();
    assert_eq!(all.len(), 4);
}
