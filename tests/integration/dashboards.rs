//! View derivation scenarios over a realistic task set.

use chrono::Duration;

use kanri::core::task::{TaskPriority, TaskStatus};
use kanri::service::{NewTaskInput, TaskEdit};
use kanri::store::TaskStore;
use kanri::views::{self, FilterSpec};

use crate::fixtures::{admin, admin_service, create_for, tanaka, today};

#[tokio::test]
async fn test_admin_view_filters_and_sorts() {
    let service = admin_service();
    let late = create_for(&service, "tanaka@example.com", "来月の締め", 30).await;
    let soon = create_for(&service, "suzuki@example.com", "今週の締め", 3).await;
    let mid = create_for(&service, "tanaka@example.com", "来週の締め", 10).await;

    let tasks = service.store().list_tasks().await.unwrap();

    let all = views::admin_view(&tasks, &FilterSpec::default(), today());
    let ids: Vec<_> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![soon.id, mid.id, late.id]);

    let filtered = views::admin_view(
        &tasks,
        &FilterSpec {
            assignee: Some("tanaka@example.com".to_string()),
            ..FilterSpec::default()
        },
        today(),
    );
    let ids: Vec<_> = filtered.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![mid.id, late.id]);
}

#[tokio::test]
async fn test_admin_overdue_filter_via_edited_due_date() {
    let service = admin_service();
    let slipped = create_for(&service, "tanaka@example.com", "遅延タスク", 5).await;
    let slipped_done = create_for(&service, "tanaka@example.com", "遅延完了", 5).await;
    let on_time = create_for(&service, "tanaka@example.com", "予定通り", 5).await;

    // Creation refuses past dates; push two tasks into the past via the
    // admin edit path, which has no such guard.
    let yesterday = today() - Duration::days(1);
    for id in [slipped.id, slipped_done.id] {
        service
            .edit_task(
                id,
                TaskEdit {
                    due_date: Some(yesterday),
                    ..TaskEdit::default()
                },
                &admin(),
            )
            .await
            .unwrap();
    }
    service.report(slipped_done.id, &tanaka()).await.unwrap();
    service.approve(slipped_done.id, &admin()).await.unwrap();

    let tasks = service.store().list_tasks().await.unwrap();
    let overdue = views::admin_view(
        &tasks,
        &FilterSpec {
            overdue_only: true,
            ..FilterSpec::default()
        },
        today(),
    );

    // Only the incomplete past-due task: done tasks are never overdue, a
    // task due today is never overdue.
    let ids: Vec<_> = overdue.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![slipped.id]);
    assert!(!overdue.iter().any(|t| t.id == on_time.id));
}

#[tokio::test]
async fn test_user_dashboard_buckets_and_counts() {
    let service = admin_service();
    let reported = create_for(&service, "tanaka@example.com", "報告済タスク", 5).await;
    let in_progress = create_for(&service, "tanaka@example.com", "作業中タスク", 3).await;
    let finished = create_for(&service, "tanaka@example.com", "完了タスク", 2).await;
    create_for(&service, "suzuki@example.com", "他人のタスク", 2).await;

    service.report(reported.id, &tanaka()).await.unwrap();
    service.report(finished.id, &tanaka()).await.unwrap();
    service.approve(finished.id, &admin()).await.unwrap();

    // One of tanaka's open tasks slips past its due date.
    service
        .edit_task(
            in_progress.id,
            TaskEdit {
                due_date: Some(today() - Duration::days(2)),
                ..TaskEdit::default()
            },
            &admin(),
        )
        .await
        .unwrap();

    let tasks = service.store().list_tasks().await.unwrap();
    let dashboard = views::user_view(&tasks, "tanaka@example.com", today());

    assert_eq!(dashboard.todo.len(), 1);
    assert_eq!(dashboard.todo[0].id, in_progress.id);
    assert_eq!(dashboard.reported.len(), 1);
    assert_eq!(dashboard.reported[0].id, reported.id);
    assert_eq!(dashboard.done.len(), 1);
    assert_eq!(dashboard.done[0].id, finished.id);
    assert_eq!(dashboard.incomplete_count(), 2);
    assert_eq!(dashboard.overdue_count, 1);
}

#[tokio::test]
async fn test_subtasks_hidden_from_lists_but_counted_under_parent() {
    let service = admin_service();
    let parent = create_for(&service, "tanaka@example.com", "提案書準備", 14).await;

    let first = service
        .create_task(NewTaskInput::Subtask {
            text: "アジェンダ作成".to_string(),
            parent_id: parent.id,
            assignee_email: None,
            priority: Some(TaskPriority::High),
        })
        .await
        .unwrap();
    service
        .create_task(NewTaskInput::Subtask {
            text: "競合資料のレビュー".to_string(),
            parent_id: parent.id,
            assignee_email: None,
            priority: None,
        })
        .await
        .unwrap();

    service.toggle_subtask(first.id, &tanaka()).await.unwrap();

    let tasks = service.store().list_tasks().await.unwrap();

    // A high-priority filter matches the first subtask and nothing else;
    // subtasks stay out of the list, so the view is empty.
    let view = views::admin_view(
        &tasks,
        &FilterSpec {
            priority: Some(TaskPriority::High),
            ..FilterSpec::default()
        },
        today(),
    );
    assert!(view.is_empty());

    let dashboard = views::user_view(&tasks, "tanaka@example.com", today());
    assert_eq!(dashboard.todo.len() + dashboard.reported.len() + dashboard.done.len(), 1);

    assert_eq!(views::subtask_progress(&tasks, parent.id), (1, 2));
    let nested = views::subtasks_of(&tasks, parent.id);
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[0].id, first.id);
    assert_eq!(nested[0].status, TaskStatus::Done);
}
