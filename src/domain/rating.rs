//! Rating records and the value objects guarding their fields.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_COMMENT_LENGTH, MAX_SCORE, MIN_COMMENT_LENGTH, MIN_SCORE};
use crate::errors::{AppError, AppResult};

/// A single user's rating of a teacher. Never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub comment: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Integer score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score(i32);

impl Score {
    pub fn new(value: i64) -> AppResult<Self> {
        if (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value as i32))
        } else {
            Err(AppError::InvalidScore)
        }
    }

    /// Accepts a JSON number with an integral value; strings, fractions and
    /// missing values are rejected.
    pub fn from_json(value: Option<&Value>) -> AppResult<Self> {
        let number = match value {
            Some(Value::Number(n)) => n,
            _ => return Err(AppError::InvalidScore),
        };

        if let Some(i) = number.as_i64() {
            return Self::new(i);
        }
        match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.is_finite() => Self::new(f as i64),
            _ => Err(AppError::InvalidScore),
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Trimmed comment of 10 to 32768 characters.
///
/// Length is measured in UTF-16 code units, so characters outside the
/// Basic Multilingual Plane (most emoji) count twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(String);

impl Comment {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        let len = trimmed.encode_utf16().count();

        if len > MAX_COMMENT_LENGTH {
            return Err(AppError::CommentTooLong);
        }
        if len < MIN_COMMENT_LENGTH {
            return Err(AppError::CommentTooShort);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validated input for a new rating
#[derive(Debug, Clone)]
pub struct NewRating {
    pub teacher_id: Uuid,
    pub user_id: Uuid,
    pub score: Score,
    pub comment: Comment,
    pub is_anonymous: bool,
}

/// Rating as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingView {
    pub id: Uuid,
    pub teacher_id: Uuid,
    /// Omitted on public listings when the rating is anonymous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Score from 1 to 5
    #[schema(example = 5)]
    pub rating: i32,
    pub comment: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl RatingView {
    /// View for public listings: anonymous ratings do not reveal their author.
    pub fn public(rating: Rating) -> Self {
        let user_id = (!rating.is_anonymous).then_some(rating.user_id);
        Self {
            user_id,
            ..Self::full(rating)
        }
    }

    /// View for the author and administrators.
    pub fn full(rating: Rating) -> Self {
        Self {
            id: rating.id,
            teacher_id: rating.teacher_id,
            user_id: Some(rating.user_id),
            rating: rating.score,
            comment: rating.comment,
            is_anonymous: rating.is_anonymous,
            created_at: rating.created_at,
        }
    }
}
