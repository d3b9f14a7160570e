//! Moderation workflow integration tests against a real database.

mod common;

use futures::future::join_all;

use common::TestContext;
use teacher_ratings::domain::{Decision, SubmissionStatus};
use teacher_ratings::errors::AppError;
use teacher_ratings::services::ServiceContainer;

#[tokio::test]
async fn test_concurrent_approvals_create_one_teacher() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("alice").await;
    let moderation = ctx.services.moderation();

    let submission = moderation
        .propose(alice.id, Some("李老师".to_string()), Some("线性代数".to_string()))
        .await
        .unwrap();
    assert_eq!(submission.status, SubmissionStatus::Pending);

    let decisions = (0..5).map(|i| {
        let decision = if i % 2 == 0 {
            Decision::Approve
        } else {
            Decision::Reject
        };
        moderation.decide(submission.id, decision, None)
    });
    let results = join_all(decisions).await;

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::AlreadyProcessed)));

    let teachers = ctx.services.teachers().list_all().await.unwrap();
    let created = teachers.iter().filter(|t| t.name == "李老师").count();
    match winners[0].status {
        SubmissionStatus::Approved => assert_eq!(created, 1),
        _ => assert_eq!(created, 0),
    }

    assert!(moderation.list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_approval_creates_active_teacher_with_default_note() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("alice").await;
    let moderation = ctx.services.moderation();

    let submission = moderation
        .propose(alice.id, Some("  陈老师 ".to_string()), None)
        .await
        .unwrap();
    assert_eq!(submission.name, "陈老师");

    let outcome = moderation
        .decide(submission.id, Decision::Approve, Some("   ".to_string()))
        .await
        .unwrap();
    assert_eq!(outcome.status, SubmissionStatus::Approved);

    let teacher = outcome.teacher.expect("approval should create a teacher");
    assert_eq!(teacher.name, "陈老师");
    assert!(teacher.is_active);
    assert_eq!(teacher.rating_count, 0);

    let mine = moderation.list_mine(alice.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, SubmissionStatus::Approved);
    assert!(!mine[0].admin_note.trim().is_empty());
    assert!(mine[0].processed_at.is_some());

    // A live teacher now blocks the same proposal
    let err = moderation
        .propose(alice.id, Some("陈老师".to_string()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateName));
}

#[tokio::test]
async fn test_rejection_keeps_note_and_creates_nothing() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("alice").await;
    let moderation = ctx.services.moderation();

    let submission = moderation
        .propose(alice.id, Some("林老师".to_string()), None)
        .await
        .unwrap();

    let outcome = moderation
        .decide(submission.id, Decision::Reject, Some("查无此人".to_string()))
        .await
        .unwrap();
    assert_eq!(outcome.status, SubmissionStatus::Rejected);
    assert!(outcome.teacher.is_none());

    let mine = moderation.list_mine(alice.id).await.unwrap();
    assert_eq!(mine[0].admin_note, "查无此人");
    assert!(ctx.services.teachers().list_all().await.unwrap().is_empty());

    let err = moderation
        .decide(submission.id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyProcessed));
}

#[tokio::test]
async fn test_approving_a_name_taken_meanwhile_leaves_submission_pending() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("alice").await;
    let moderation = ctx.services.moderation();

    let submission = moderation
        .propose(alice.id, Some("黄老师".to_string()), None)
        .await
        .unwrap();
    ctx.teacher("黄老师").await;

    let err = moderation
        .decide(submission.id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateName));

    let pending = moderation.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, submission.id);
}

#[tokio::test]
async fn test_unknown_submission() {
    let ctx = TestContext::new().await;
    let err = ctx
        .services
        .moderation()
        .decide(uuid::Uuid::new_v4(), Decision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
