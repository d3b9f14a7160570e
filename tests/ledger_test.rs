//! Rating ledger integration tests against a real database.

mod common;

use futures::future::join_all;
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;

use common::TestContext;
use teacher_ratings::errors::AppError;
use teacher_ratings::services::{RatingSubmission, ServiceContainer};
use teacher_ratings::types::PageRequest;

fn rating_for(teacher_id: uuid::Uuid, score: i64) -> RatingSubmission {
    RatingSubmission {
        teacher_id: Some(teacher_id.to_string()),
        score: Some(json!(score)),
        comment: Some("讲解非常清楚，推荐大家选这门课".to_string()),
        is_anonymous: false,
    }
}

#[tokio::test]
async fn test_aggregate_follows_submissions_and_removals() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("张老师").await;
    let ratings = ctx.services.ratings();

    let mut ids = Vec::new();
    for (name, score) in [("alice", 5), ("bob", 4), ("carol", 2)] {
        let user = ctx.register(name).await;
        let rating = ratings.submit(user.id, rating_for(teacher.id, score)).await.unwrap();
        ids.push(rating.id);
    }

    let reloaded = ctx.reload(&teacher).await;
    assert_eq!(reloaded.rating_count, 3);
    assert_eq!(reloaded.rating_sum, 11);
    assert_eq!(reloaded.display_rating(), 3.7);

    let removed = ratings.remove(ids[1]).await.unwrap();
    assert_eq!(removed.score, 4);

    let reloaded = ctx.reload(&teacher).await;
    assert_eq!(reloaded.rating_count, 2);
    assert_eq!(reloaded.rating_sum, 7);
    assert_eq!(reloaded.display_rating(), 3.5);
    assert!(reloaded.aggregate_is_sound());
}

#[tokio::test]
async fn test_concurrent_duplicate_submissions_accept_exactly_one() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("王老师").await;
    let user = ctx.register("alice").await;
    let ratings = ctx.services.ratings();

    let attempts = (0..4).map(|_| ratings.submit(user.id, rating_for(teacher.id, 5)));
    let results = join_all(attempts).await;

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::DuplicateRating)));

    let reloaded = ctx.reload(&teacher).await;
    assert_eq!(reloaded.rating_count, 1);
    assert_eq!(reloaded.rating_sum, 5);
}

#[tokio::test]
async fn test_concurrent_distinct_users_lose_no_increment() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("李老师").await;

    let mut users = Vec::new();
    for i in 0..8 {
        users.push(ctx.register(&format!("student{}", i)).await);
    }

    let ratings = ctx.services.ratings();
    let submissions = users
        .iter()
        .enumerate()
        .map(|(i, user)| ratings.submit(user.id, rating_for(teacher.id, (i % 5 + 1) as i64)));
    let results = join_all(submissions).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let expected_sum: i64 = (0..8).map(|i| (i % 5 + 1) as i64).sum();
    let reloaded = ctx.reload(&teacher).await;
    assert_eq!(reloaded.rating_count, 8);
    assert_eq!(reloaded.rating_sum, expected_sum);
}

#[tokio::test]
async fn test_removing_twice_touches_aggregate_once() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("赵老师").await;
    let user = ctx.register("alice").await;
    let ratings = ctx.services.ratings();

    let rating = ratings.submit(user.id, rating_for(teacher.id, 3)).await.unwrap();
    ratings.remove(rating.id).await.unwrap();

    let err = ratings.remove(rating.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let reloaded = ctx.reload(&teacher).await;
    assert_eq!(reloaded.rating_count, 0);
    assert_eq!(reloaded.rating_sum, 0);

    // The user may rate again once their rating is gone
    assert!(ratings.submit(user.id, rating_for(teacher.id, 4)).await.is_ok());
}

#[tokio::test]
async fn test_removal_never_drives_aggregate_negative() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("钱老师").await;
    let user = ctx.register("alice").await;
    let ratings = ctx.services.ratings();

    let rating = ratings.submit(user.id, rating_for(teacher.id, 5)).await.unwrap();

    let connection = ctx.database.connection();
    connection
        .execute(Statement::from_string(
            connection.get_database_backend(),
            "UPDATE teachers SET rating_count = 0, rating_sum = 0".to_string(),
        ))
        .await
        .unwrap();

    ratings.remove(rating.id).await.unwrap();

    let reloaded = ctx.reload(&teacher).await;
    assert_eq!(reloaded.rating_count, 0);
    assert_eq!(reloaded.rating_sum, 0);
}

#[tokio::test]
async fn test_inactive_teacher_refuses_ratings() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("孙老师").await;
    let user = ctx.register("alice").await;

    ctx.services.teachers().set_active(teacher.id, false).await.unwrap();

    let err = ctx
        .services
        .ratings()
        .submit(user.id, rating_for(teacher.id, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TeacherInactive));
    assert_eq!(ctx.reload(&teacher).await.rating_count, 0);
}

#[tokio::test]
async fn test_deleting_teacher_removes_its_ratings() {
    let ctx = TestContext::new().await;
    let teacher = ctx.teacher("周老师").await;
    let other = ctx.teacher("吴老师").await;
    let ratings = ctx.services.ratings();

    let alice = ctx.register("alice").await;
    let bob = ctx.register("bob").await;
    ratings.submit(alice.id, rating_for(teacher.id, 5)).await.unwrap();
    ratings.submit(bob.id, rating_for(teacher.id, 1)).await.unwrap();
    ratings.submit(bob.id, rating_for(other.id, 3)).await.unwrap();

    let removed = ctx.services.teachers().delete(teacher.id).await.unwrap();
    assert_eq!(removed, 2);

    let remaining = ratings.list_all(PageRequest::new(1, 10)).await.unwrap();
    assert_eq!(remaining.meta.total, 1);
    assert_eq!(remaining.items[0].teacher_id, other.id);

    let err = ctx.services.teachers().get(teacher.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = ctx.services.teachers().delete(teacher.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
