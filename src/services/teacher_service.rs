//! Teacher directory - listing, creation, activation and deletion.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Teacher, TeacherName};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::types::{PageRequest, Paginated};

const TEACHER_NOT_FOUND: &str = "Teacher not found";
const TEACHER_MISSING: &str = "教师不存在";

/// Teacher service trait for dependency injection.
#[async_trait]
pub trait TeacherService: Send + Sync {
    /// Active teachers, optionally filtered by a case-insensitive name fragment
    async fn list_active(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Teacher>>;

    async fn get(&self, id: Uuid) -> AppResult<Teacher>;

    /// Every teacher including inactive ones
    async fn list_all(&self) -> AppResult<Vec<Teacher>>;

    /// Create an active teacher with a zeroed aggregate
    async fn create(&self, name: Option<String>, description: Option<String>)
        -> AppResult<Teacher>;

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Teacher>;

    /// Delete a teacher and all its ratings. Returns the number of ratings removed.
    async fn delete(&self, id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of TeacherService using Unit of Work.
pub struct TeacherDirectory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TeacherDirectory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TeacherService for TeacherDirectory<U> {
    async fn list_active(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Teacher>> {
        self.uow.teachers().list_active(search, page).await
    }

    async fn get(&self, id: Uuid) -> AppResult<Teacher> {
        self.uow
            .teachers()
            .find_by_id(id)
            .await?
            .ok_or_not_found(TEACHER_NOT_FOUND)
    }

    async fn list_all(&self) -> AppResult<Vec<Teacher>> {
        self.uow.teachers().list_all().await
    }

    async fn create(
        &self,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<Teacher> {
        let name = TeacherName::parse(name.as_deref())?;
        let teachers = self.uow.teachers();

        if teachers.find_by_name(name.as_str()).await?.is_some() {
            return Err(AppError::DuplicateName);
        }

        let description = description.map(|d| d.trim().to_string()).unwrap_or_default();
        let teacher = teachers.create(name.into_inner(), description).await?;

        tracing::info!(teacher_id = %teacher.id, name = %teacher.name, "Teacher created");
        Ok(teacher)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Teacher> {
        let teacher = self
            .uow
            .teachers()
            .set_active(id, active)
            .await?
            .ok_or_not_found(TEACHER_MISSING)?;

        tracing::info!(teacher_id = %id, active, "Teacher activity changed");
        Ok(teacher)
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let removed: u64 = self
            .uow
            .transaction(move |ctx| Box::pin(delete_with_ratings(ctx, id)))
            .await?;

        tracing::info!(teacher_id = %id, ratings_removed = removed, "Teacher deleted");
        Ok(removed)
    }
}

/// Ratings first, then the teacher. A missing teacher rolls everything back.
async fn delete_with_ratings(ctx: TransactionContext<'_>, id: Uuid) -> AppResult<u64> {
    let removed = ctx.ratings().delete_for_teacher(id).await?;
    if ctx.teachers().delete(id).await? == 0 {
        return Err(AppError::not_found(TEACHER_MISSING));
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{test_teacher, TestUnitOfWork};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_get_unknown_teacher() {
        let mut uow = TestUnitOfWork::new();
        uow.teachers.expect_find_by_id().returning(|_| Ok(None));
        let directory = TeacherDirectory::new(uow.build());

        let err = directory.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), "Teacher not found");
    }

    #[tokio::test]
    async fn test_create_trims_and_checks_name() {
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_name()
            .withf(|name: &str| name == "张老师")
            .returning(|_| Ok(None));
        uow.teachers
            .expect_create()
            .with(eq("张老师".to_string()), eq(String::new()))
            .times(1)
            .returning(|name, description| {
                Ok(Teacher {
                    name,
                    description,
                    ..test_teacher(Uuid::new_v4(), true)
                })
            });
        let directory = TeacherDirectory::new(uow.build());

        let teacher = directory
            .create(Some("  张老师  ".to_string()), None)
            .await
            .unwrap();

        assert_eq!(teacher.name, "张老师");
        assert!(teacher.is_active);
        assert_eq!((teacher.rating_count, teacher.rating_sum), (0, 0));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_and_blank_names() {
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_name()
            .returning(|_| Ok(Some(test_teacher(Uuid::new_v4(), false))));
        uow.teachers.expect_create().never();
        let directory = TeacherDirectory::new(uow.build());

        assert!(matches!(
            directory.create(Some("王老师".to_string()), None).await,
            Err(AppError::DuplicateName)
        ));
        assert!(matches!(
            directory.create(Some(" ".to_string()), None).await,
            Err(AppError::InvalidName)
        ));
    }

    #[tokio::test]
    async fn test_set_active_unknown_teacher() {
        let mut uow = TestUnitOfWork::new();
        uow.teachers.expect_set_active().returning(|_, _| Ok(None));
        let directory = TeacherDirectory::new(uow.build());

        let err = directory.set_active(Uuid::new_v4(), true).await.unwrap_err();
        assert_eq!(err.to_string(), "教师不存在");
    }
}
