//! Teacher directory persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::teacher::{self, ActiveModel, Entity as TeacherEntity};
use crate::domain::Teacher;
use crate::errors::{AppError, AppResult};
use crate::types::{PageRequest, Paginated};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Teacher repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Find teacher by ID regardless of activity
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Teacher>>;

    /// Find teacher by exact (trimmed) name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Teacher>>;

    /// Active teachers, newest first, optionally filtered by a
    /// case-insensitive name substring
    async fn list_active(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Teacher>>;

    /// Every teacher including inactive ones, newest first
    async fn list_all(&self) -> AppResult<Vec<Teacher>>;

    /// Create an active teacher with zeroed aggregates
    async fn create(&self, name: String, description: String) -> AppResult<Teacher>;

    /// Flip the activity flag; `None` when the teacher does not exist
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Teacher>>;
}

/// Concrete implementation of TeacherRepository
pub struct TeacherStore {
    db: DatabaseConnection,
}

impl TeacherStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeacherRepository for TeacherStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Teacher>> {
        find_teacher(&self.db, id).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Teacher>> {
        let result = TeacherEntity::find()
            .filter(teacher::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(result.map(Teacher::from))
    }

    async fn list_active(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Teacher>> {
        let mut query = TeacherEntity::find().filter(teacher::Column::IsActive.eq(true));

        if let Some(term) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(teacher::Column::Name)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        let paginator = query
            .order_by_desc(teacher::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.index()).await?;

        Ok(Paginated::new(
            models.into_iter().map(Teacher::from).collect(),
            page,
            total,
        ))
    }

    async fn list_all(&self) -> AppResult<Vec<Teacher>> {
        let models = TeacherEntity::find()
            .order_by_desc(teacher::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Teacher::from).collect())
    }

    async fn create(&self, name: String, description: String) -> AppResult<Teacher> {
        insert_teacher(&self.db, name, description).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Teacher>> {
        let result = TeacherEntity::update_many()
            .col_expr(teacher::Column::IsActive, Expr::value(active))
            .col_expr(teacher::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(teacher::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        find_teacher(&self.db, id).await
    }
}

pub(crate) async fn find_teacher<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Teacher>> {
    let result = TeacherEntity::find_by_id(id).one(db).await?;
    Ok(result.map(Teacher::from))
}

/// Insert an active teacher. A name collision surfaces as `DuplicateName`.
pub(crate) async fn insert_teacher<C: ConnectionTrait>(
    db: &C,
    name: String,
    description: String,
) -> AppResult<Teacher> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(description),
        is_active: Set(true),
        rating_count: Set(0),
        rating_sum: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(db).await.map_err(|e| {
        if AppError::is_unique_violation(&e) {
            AppError::DuplicateName
        } else {
            AppError::from(e)
        }
    })?;

    Ok(Teacher::from(model))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("王"), "王");
    }
}
