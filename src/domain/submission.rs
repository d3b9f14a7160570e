//! Teacher proposals and their moderation state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{DEFAULT_APPROVE_NOTE, DEFAULT_REJECT_NOTE};
use crate::errors::AppError;

/// `pending` is initial; `approved` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

impl TryFrom<&str> for SubmissionStatus {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(AppError::internal(format!(
                "Unknown submission status in storage: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An admin's verdict on a pending submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status the submission moves to
    pub fn target_status(&self) -> SubmissionStatus {
        match self {
            Decision::Approve => SubmissionStatus::Approved,
            Decision::Reject => SubmissionStatus::Rejected,
        }
    }

    /// Note recorded when the admin supplies none (blank counts as none)
    pub fn note_or_default(&self, note: Option<String>) -> String {
        match note.filter(|n| !n.trim().is_empty()) {
            Some(note) => note,
            None => match self {
                Decision::Approve => DEFAULT_APPROVE_NOTE.to_string(),
                Decision::Reject => DEFAULT_REJECT_NOTE.to_string(),
            },
        }
    }
}

/// A user's proposal for a new teacher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    #[schema(example = "李老师")]
    pub name: String,
    pub description: String,
    pub submitted_by: Uuid,
    pub status: SubmissionStatus,
    pub admin_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
