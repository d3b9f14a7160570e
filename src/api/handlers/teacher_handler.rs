//! Teacher directory handlers.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{EntityId, ValidatedJson};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_SIZE, DEFAULT_RATINGS_PAGE_SIZE};
use crate::domain::{RatingView, TeacherDetail, TeacherSummary};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, PaginationParams};

/// Teacher listing query
#[derive(Debug, Deserialize)]
pub struct TeacherListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    /// Case-insensitive name fragment
    pub search: Option<String>,
}

/// Request to create a teacher directly
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherRequest {
    #[schema(example = "李老师")]
    pub name: Option<String>,
    #[schema(example = "高等数学")]
    pub description: Option<String>,
}

/// Public teacher routes
pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers))
        .route("/:id", get(get_teacher))
        .route("/:id/ratings", get(list_teacher_ratings))
}

/// Admin-only teacher routes mounted beside `teacher_routes`
pub fn teacher_admin_routes() -> Router<AppState> {
    Router::new().route("/", post(create_teacher))
}

/// List active teachers
#[utoipa::path(
    get,
    path = "/api/teachers",
    tag = "Teachers",
    params(PaginationParams, ("search" = Option<String>, Query, description = "Name fragment")),
    responses(
        (status = 200, description = "Active teachers, newest first", body = [TeacherSummary])
    )
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    Query(query): Query<TeacherListQuery>,
) -> AppResult<ApiResponse<Vec<TeacherSummary>>> {
    let page = query.pagination.resolve(DEFAULT_PAGE_SIZE);
    let teachers = state.teacher_service.list_active(query.search, page).await?;

    Ok(ApiResponse::paginated(teachers.map(TeacherSummary::from)))
}

/// Get a teacher with its display rating
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    tag = "Teachers",
    params(("id" = uuid::Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher", body = TeacherSummary),
        (status = 400, description = "Invalid id format"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<ApiResponse<TeacherSummary>> {
    let teacher = state.teacher_service.get(id).await?;
    Ok(ApiResponse::success(TeacherSummary::from(teacher)))
}

/// List ratings of a teacher
#[utoipa::path(
    get,
    path = "/api/teachers/{id}/ratings",
    tag = "Teachers",
    params(("id" = uuid::Uuid, Path, description = "Teacher id"), PaginationParams),
    responses(
        (status = 200, description = "Ratings, newest first; anonymous ratings omit userId", body = [RatingView]),
        (status = 400, description = "Invalid id format"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn list_teacher_ratings(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<RatingView>>> {
    let page = pagination.resolve(DEFAULT_RATINGS_PAGE_SIZE);
    let ratings = state.rating_service.list_for_teacher(id, page).await?;

    Ok(ApiResponse::paginated(ratings))
}

/// Create an active teacher
#[utoipa::path(
    post,
    path = "/api/teachers",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherDetail),
        (status = 400, description = "Missing or duplicate name"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "The user is not an admin")
    )
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTeacherRequest>,
) -> AppResult<Created<TeacherDetail>> {
    let teacher = state
        .teacher_service
        .create(payload.name, payload.description)
        .await?;

    Ok(Created(ApiResponse::with_message(
        TeacherDetail::from(teacher),
        "Teacher created successfully",
    )))
}
