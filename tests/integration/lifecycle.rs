//! End-to-end task lifecycle flows: creation, reporting, approval,
//! send-back, subtasks, cascade deletion.

use kanri::core::task::TaskStatus;
use kanri::core::user::{User, UserRole};
use kanri::service::NewTaskInput;
use kanri::store::TaskStore;
use kanri::Error;

use crate::fixtures::{admin, admin_service, create_for, mmdd_in, suzuki, tanaka};

#[tokio::test]
async fn test_report_then_approve_flow() {
    let service = admin_service();
    let task = create_for(&service, "tanaka@example.com", "月次レポート提出", 14).await;
    assert_eq!(task.status, TaskStatus::Todo);

    let reported = service.report(task.id, &tanaka()).await.unwrap();
    assert_eq!(reported.status, TaskStatus::Reported);
    assert!(reported.updated_at >= task.updated_at);

    let approved = service.approve(task.id, &admin()).await.unwrap();
    assert_eq!(approved.status, TaskStatus::Done);

    // DONE is terminal: nothing moves it, not even an admin.
    assert!(matches!(
        service.send_back(task.id, &admin()).await,
        Err(Error::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_send_back_allows_re_reporting() {
    let service = admin_service();
    let task = create_for(&service, "tanaka@example.com", "提案書準備", 7).await;

    service.report(task.id, &tanaka()).await.unwrap();
    let sent_back = service.send_back(task.id, &admin()).await.unwrap();
    assert_eq!(sent_back.status, TaskStatus::Todo);

    let re_reported = service.report(task.id, &tanaka()).await.unwrap();
    assert_eq!(re_reported.status, TaskStatus::Reported);
}

#[tokio::test]
async fn test_non_assignee_cannot_report() {
    let service = admin_service();
    let task = create_for(&service, "tanaka@example.com", "経費精算", 7).await;

    assert!(matches!(
        service.report(task.id, &suzuki()).await,
        Err(Error::Forbidden(_))
    ));
    assert!(matches!(
        service.report(task.id, &admin()).await,
        Err(Error::Forbidden(_))
    ));

    // The rejected attempts left the task untouched.
    let tasks = service.store().list_tasks().await.unwrap();
    assert_eq!(tasks[0].status, TaskStatus::Todo);
    assert_eq!(tasks[0].updated_at, task.updated_at);
}

#[tokio::test]
async fn test_report_stamps_updated_at_only() {
    let service = admin_service();
    let task = create_for(&service, "tanaka@example.com", "競合分析", 7).await;

    let reported = service.report(task.id, &tanaka()).await.unwrap();
    assert_eq!(reported.title, task.title);
    assert_eq!(reported.assignee_email, task.assignee_email);
    assert_eq!(reported.due_date, task.due_date);
    assert_eq!(reported.priority, task.priority);
    assert_eq!(reported.created_at, task.created_at);
    assert!(reported.updated_at >= task.updated_at);
}

#[tokio::test]
async fn test_subtask_inherits_parent_due_date_ignoring_title_dates() {
    let service = admin_service();
    let parent = create_for(&service, "tanaka@example.com", "提案書準備", 14).await;

    // The subtask text names a different date; it must stay in the title
    // and never influence the due date.
    let subtask = service
        .create_task(NewTaskInput::Subtask {
            text: format!("アジェンダ作成 {}", mmdd_in(3)),
            parent_id: parent.id,
            assignee_email: None,
            priority: None,
        })
        .await
        .unwrap();

    assert_eq!(subtask.due_date, parent.due_date);
    assert!(subtask.title.contains(&mmdd_in(3)));
    assert_eq!(subtask.parent_task_id, Some(parent.id));
}

#[tokio::test]
async fn test_subtask_inherits_assignee_and_priority_defaults() {
    let service = admin_service();
    let parent = create_for(&service, "tanaka@example.com", "提案書準備", 14).await;

    let inherited = service
        .create_task(NewTaskInput::Subtask {
            text: "レビュー依頼".to_string(),
            parent_id: parent.id,
            assignee_email: None,
            priority: None,
        })
        .await
        .unwrap();
    assert_eq!(inherited.assignee_email, parent.assignee_email);
    assert_eq!(inherited.priority, parent.priority);

    let overridden = service
        .create_task(NewTaskInput::Subtask {
            text: "資料レビュー".to_string(),
            parent_id: parent.id,
            assignee_email: Some("suzuki@example.com".to_string()),
            priority: Some(kanri::TaskPriority::High),
        })
        .await
        .unwrap();
    assert_eq!(overridden.assignee_email, "suzuki@example.com");
    assert_eq!(overridden.assignee_name, "鈴木");
    assert_eq!(overridden.priority, kanri::TaskPriority::High);
    // Due date inheritance holds regardless of overrides.
    assert_eq!(overridden.due_date, parent.due_date);
}

#[tokio::test]
async fn test_delete_cascades_exactly_to_own_subtasks() {
    let service = admin_service();
    let doomed = create_for(&service, "tanaka@example.com", "中止案件", 14).await;
    let survivor = create_for(&service, "suzuki@example.com", "継続案件", 14).await;

    for title in ["資料集め", "下書き"] {
        service
            .create_task(NewTaskInput::Subtask {
                text: title.to_string(),
                parent_id: doomed.id,
                assignee_email: None,
                priority: None,
            })
            .await
            .unwrap();
    }
    let kept_sub = service
        .create_task(NewTaskInput::Subtask {
            text: "継続の下書き".to_string(),
            parent_id: survivor.id,
            assignee_email: None,
            priority: None,
        })
        .await
        .unwrap();

    service.delete_task(doomed.id, &admin()).await.unwrap();

    let remaining = service.store().list_tasks().await.unwrap();
    let ids: Vec<_> = remaining.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![survivor.id, kept_sub.id]);
}

#[tokio::test]
async fn test_subtask_toggle_round_trip() {
    let service = admin_service();
    let parent = create_for(&service, "tanaka@example.com", "提案書準備", 14).await;
    let subtask = service
        .create_task(NewTaskInput::Subtask {
            text: "アジェンダ作成".to_string(),
            parent_id: parent.id,
            assignee_email: None,
            priority: None,
        })
        .await
        .unwrap();

    let done = service.toggle_subtask(subtask.id, &tanaka()).await.unwrap();
    assert_eq!(done.status, TaskStatus::Done);

    let back = service.toggle_subtask(subtask.id, &tanaka()).await.unwrap();
    assert_eq!(back.status, TaskStatus::Todo);
}

#[tokio::test]
async fn test_subtask_toggle_limited_to_viewers() {
    let service = admin_service();
    let parent = create_for(&service, "tanaka@example.com", "提案書準備", 14).await;
    let subtask = service
        .create_task(NewTaskInput::Subtask {
            text: "アジェンダ作成".to_string(),
            parent_id: parent.id,
            assignee_email: Some("suzuki@example.com".to_string()),
            priority: None,
        })
        .await
        .unwrap();

    // Admin, the subtask assignee, and the parent assignee may all toggle.
    service.toggle_subtask(subtask.id, &admin()).await.unwrap();
    service.toggle_subtask(subtask.id, &suzuki()).await.unwrap();
    service.toggle_subtask(subtask.id, &tanaka()).await.unwrap();

    let outsider = User::new("sato@example.com", "佐藤", UserRole::User);
    assert!(matches!(
        service.toggle_subtask(subtask.id, &outsider).await,
        Err(Error::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_command_flow_end_to_end() {
    let service = admin_service();
    let task = service
        .create_from_command(&format!("@bot 田中 レポート提出 {} High", mmdd_in(10)))
        .await
        .unwrap();

    assert_eq!(task.assignee_email, "tanaka@example.com");
    assert_eq!(task.priority, kanri::TaskPriority::High);

    service.report(task.id, &tanaka()).await.unwrap();
    let approved = service.approve(task.id, &admin()).await.unwrap();
    assert_eq!(approved.status, TaskStatus::Done);
}

#[tokio::test]
async fn test_failed_creation_leaves_no_trace() {
    let service = admin_service();

    let result = service
        .create_task(NewTaskInput::TopLevel {
            text: "日付のないタスク".to_string(),
            assignee_email: "tanaka@example.com".to_string(),
            priority: kanri::TaskPriority::Medium,
        })
        .await;
    assert!(matches!(result, Err(Error::DateNotFound)));
    assert!(service.store().list_tasks().await.unwrap().is_empty());
}
