//! Teacher entity and its rating aggregate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::MAX_SCORE;
use crate::errors::{AppError, AppResult};

/// A rateable teacher.
///
/// `rating_count` always equals the number of live ratings that reference
/// the teacher and `rating_sum` their score total.
#[derive(Debug, Clone, PartialEq)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub rating_count: i64,
    pub rating_sum: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    /// Mean score rounded to one decimal, `0.0` when unrated.
    pub fn display_rating(&self) -> f64 {
        display_rating(self.rating_count, self.rating_sum)
    }

    /// Whether the aggregate is internally consistent.
    pub fn aggregate_is_sound(&self) -> bool {
        self.rating_count >= 0
            && self.rating_sum >= 0
            && self.rating_sum <= MAX_SCORE * self.rating_count
    }
}

pub fn display_rating(count: i64, sum: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    let mean = sum as f64 / count as f64;
    (mean * 10.0).round() / 10.0
}

/// Trimmed, non-empty teacher name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherName(String);

impl TeacherName {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(Self(name.to_string())),
            _ => Err(AppError::InvalidName),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Public view of a teacher
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummary {
    pub id: Uuid,
    #[schema(example = "李老师")]
    pub name: String,
    pub description: String,
    /// Mean score rounded to one decimal, 0 when unrated
    #[schema(example = 4.5)]
    pub rating: f64,
    pub rating_count: i64,
}

impl From<Teacher> for TeacherSummary {
    fn from(teacher: Teacher) -> Self {
        Self {
            rating: teacher.display_rating(),
            id: teacher.id,
            name: teacher.name,
            description: teacher.description,
            rating_count: teacher.rating_count,
        }
    }
}

/// Administrative view of a teacher including raw aggregates
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub rating: f64,
    pub rating_count: i64,
    pub rating_sum: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Teacher> for TeacherDetail {
    fn from(teacher: Teacher) -> Self {
        Self {
            rating: teacher.display_rating(),
            id: teacher.id,
            name: teacher.name,
            description: teacher.description,
            is_active: teacher.is_active,
            rating_count: teacher.rating_count,
            rating_sum: teacher.rating_sum,
            created_at: teacher.created_at,
            updated_at: teacher.updated_at,
        }
    }
}
