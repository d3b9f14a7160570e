//! Moderation workflow - turns a teacher proposal into a live teacher once.
//!
//! A submission leaves `pending` through a conditional update, so of several
//! concurrent decisions exactly one changes the row; the rest observe
//! `AlreadyProcessed`.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Decision, Submission, SubmissionStatus, Teacher, TeacherName};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};

const SUBMISSION_NOT_FOUND: &str = "投稿不存在";

/// Result of a moderation decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    /// Teacher created by an approval
    pub teacher: Option<Teacher>,
}

/// Moderation service trait for dependency injection.
#[async_trait]
pub trait ModerationService: Send + Sync {
    /// Propose a new teacher. The submission starts out pending.
    async fn propose(
        &self,
        actor_id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<Submission>;

    /// Approve or reject a pending submission.
    async fn decide(
        &self,
        submission_id: Uuid,
        decision: Decision,
        note: Option<String>,
    ) -> AppResult<DecisionOutcome>;

    /// Submissions made by `actor_id`, newest first
    async fn list_mine(&self, actor_id: Uuid) -> AppResult<Vec<Submission>>;

    /// Submissions awaiting a decision, newest first
    async fn list_pending(&self) -> AppResult<Vec<Submission>>;
}

/// Concrete implementation of ModerationService using Unit of Work.
pub struct ModerationWorkflow<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ModerationWorkflow<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ModerationService for ModerationWorkflow<U> {
    async fn propose(
        &self,
        actor_id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<Submission> {
        let name = TeacherName::parse(name.as_deref())?;

        // Only live teachers block a proposal; other pending submissions do not.
        if self.uow.teachers().find_by_name(name.as_str()).await?.is_some() {
            return Err(AppError::DuplicateName);
        }

        let description = description.map(|d| d.trim().to_string()).unwrap_or_default();
        let submission = self
            .uow
            .submissions()
            .create(name.into_inner(), description, actor_id)
            .await?;

        tracing::info!(
            submission_id = %submission.id,
            submitted_by = %actor_id,
            "Teacher proposal submitted"
        );
        Ok(submission)
    }

    async fn decide(
        &self,
        submission_id: Uuid,
        decision: Decision,
        note: Option<String>,
    ) -> AppResult<DecisionOutcome> {
        let note = decision.note_or_default(note);
        let outcome: DecisionOutcome = self
            .uow
            .transaction(move |ctx| Box::pin(apply_decision(ctx, submission_id, decision, note)))
            .await?;

        tracing::info!(
            submission_id = %outcome.submission_id,
            status = %outcome.status,
            teacher_id = ?outcome.teacher.as_ref().map(|t| t.id),
            "Submission decided"
        );
        Ok(outcome)
    }

    async fn list_mine(&self, actor_id: Uuid) -> AppResult<Vec<Submission>> {
        self.uow.submissions().list_by_submitter(actor_id).await
    }

    async fn list_pending(&self) -> AppResult<Vec<Submission>> {
        self.uow.submissions().list_pending().await
    }
}

/// Transition the submission and, on approval, create its teacher.
///
/// A name taken since the proposal fails with `DuplicateName`, rolling the
/// transition back so the submission stays pending.
async fn apply_decision(
    ctx: TransactionContext<'_>,
    submission_id: Uuid,
    decision: Decision,
    note: String,
) -> AppResult<DecisionOutcome> {
    let submissions = ctx.submissions();
    let submission = submissions
        .find_by_id(submission_id)
        .await?
        .ok_or_not_found(SUBMISSION_NOT_FOUND)?;
    if submission.status.is_terminal() {
        return Err(AppError::AlreadyProcessed);
    }

    let status = decision.target_status();
    if submissions
        .transition(submission_id, status, note, Utc::now())
        .await?
        == 0
    {
        return Err(AppError::AlreadyProcessed);
    }

    let teacher = match decision {
        Decision::Approve => Some(
            ctx.teachers()
                .create(submission.name, submission.description)
                .await?,
        ),
        Decision::Reject => None,
    };

    Ok(DecisionOutcome {
        submission_id,
        status,
        teacher,
    })
}
