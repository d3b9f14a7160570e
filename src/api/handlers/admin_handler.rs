//! Administrative handlers: directory, accounts, ratings and moderation.

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{EntityId, ValidatedJson};
use crate::api::handlers::teacher_handler::CreateTeacherRequest;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{
    Decision, RatingView, Submission, SubmissionStatus, TeacherDetail, UserResponse,
};
use crate::errors::AppResult;
use crate::services::DecisionOutcome;
use crate::types::{ApiResponse, Created, PaginationParams};

/// Optional note attached to a moderation decision
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    #[schema(example = "信息核实无误")]
    pub admin_note: Option<String>,
}

/// Outcome of approving or rejecting a submission
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    /// Teacher created by an approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<TeacherDetail>,
}

impl From<DecisionOutcome> for DecisionResponse {
    fn from(outcome: DecisionOutcome) -> Self {
        Self {
            submission_id: outcome.submission_id,
            status: outcome.status,
            teacher: outcome.teacher.map(TeacherDetail::from),
        }
    }
}

/// Admin-only routes; callers mount them behind auth and admin checks
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_all_teachers).post(admin_create_teacher))
        .route("/teachers/:id", delete(delete_teacher))
        .route("/teachers/:id/approve", post(approve_teacher))
        .route("/teachers/:id/deactivate", post(deactivate_teacher))
        .route("/users", get(list_users))
        .route("/users/:id/toggle", post(toggle_user))
        .route("/ratings", get(list_all_ratings))
        .route("/ratings/:id", delete(delete_rating))
        .route("/submissions", get(list_pending_submissions))
        .route("/submissions/:id/approve", post(approve_submission))
        .route("/submissions/:id/reject", post(reject_submission))
}

/// List every teacher, including inactive ones
#[utoipa::path(
    get,
    path = "/api/admin/teachers",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All teachers, newest first", body = [TeacherDetail]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "The user is not an admin")
    )
)]
pub async fn list_all_teachers(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TeacherDetail>>> {
    let teachers = state.teacher_service.list_all().await?;
    Ok(ApiResponse::success(
        teachers.into_iter().map(TeacherDetail::from).collect(),
    ))
}

/// Create an active teacher
#[utoipa::path(
    post,
    path = "/api/admin/teachers",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherDetail),
        (status = 400, description = "Missing or duplicate name"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "The user is not an admin")
    )
)]
pub async fn admin_create_teacher(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTeacherRequest>,
) -> AppResult<Created<TeacherDetail>> {
    let teacher = state
        .teacher_service
        .create(payload.name, payload.description)
        .await?;

    Ok(Created(ApiResponse::with_message(
        TeacherDetail::from(teacher),
        "教师创建成功",
    )))
}

/// Activate a teacher
#[utoipa::path(
    post,
    path = "/api/admin/teachers/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher activated", body = TeacherDetail),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn approve_teacher(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<ApiResponse<TeacherDetail>> {
    let teacher = state.teacher_service.set_active(id, true).await?;
    Ok(ApiResponse::with_message(
        TeacherDetail::from(teacher),
        "教师审核通过",
    ))
}

/// Hide a teacher from the public directory
#[utoipa::path(
    post,
    path = "/api/admin/teachers/{id}/deactivate",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher deactivated", body = TeacherDetail),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn deactivate_teacher(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<ApiResponse<TeacherDetail>> {
    let teacher = state.teacher_service.set_active(id, false).await?;
    Ok(ApiResponse::with_message(
        TeacherDetail::from(teacher),
        "教师已停用",
    ))
}

/// Delete a teacher together with its ratings
#[utoipa::path(
    delete,
    path = "/api/admin/teachers/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<ApiResponse<()>> {
    state.teacher_service.delete(id).await?;
    Ok(ApiResponse::message("教师已删除"))
}

/// List every account
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users, newest first", body = [UserResponse]),
        (status = 403, description = "The user is not an admin")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Ban or unban an account
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/toggle",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Account flipped", body = UserResponse),
        (status = 400, description = "You cannot ban yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    EntityId(id): EntityId,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.toggle_active(current_user.id, id).await?;
    let message = if user.is_active {
        "用户已启用"
    } else {
        "用户已封禁"
    };

    Ok(ApiResponse::with_message(UserResponse::from(user), message))
}

/// List every rating
#[utoipa::path(
    get,
    path = "/api/admin/ratings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "All ratings, newest first", body = [RatingView]),
        (status = 403, description = "The user is not an admin")
    )
)]
pub async fn list_all_ratings(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<RatingView>>> {
    let page = pagination.resolve(DEFAULT_PAGE_SIZE);
    let ratings = state.rating_service.list_all(page).await?;
    Ok(ApiResponse::paginated(ratings))
}

/// Remove a rating and roll back its contribution
#[utoipa::path(
    delete,
    path = "/api/admin/ratings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rating id")),
    responses(
        (status = 200, description = "Rating deleted", body = RatingView),
        (status = 404, description = "Rating not found")
    )
)]
pub async fn delete_rating(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<ApiResponse<RatingView>> {
    let rating = state.rating_service.remove(id).await?;
    Ok(ApiResponse::with_message(RatingView::full(rating), "评价已删除"))
}

/// List submissions awaiting review
#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending submissions, newest first", body = [Submission]),
        (status = 403, description = "The user is not an admin")
    )
)]
pub async fn list_pending_submissions(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Submission>>> {
    let submissions = state.moderation_service.list_pending().await?;
    Ok(ApiResponse::success(submissions))
}

/// Approve a submission, creating its teacher
#[utoipa::path(
    post,
    path = "/api/admin/submissions/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Submission id")),
    request_body(content = DecisionRequest, description = "Optional admin note"),
    responses(
        (status = 200, description = "Submission approved", body = DecisionResponse),
        (status = 400, description = "Already processed or teacher already listed"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn approve_submission(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    body: Option<Json<DecisionRequest>>,
) -> AppResult<ApiResponse<DecisionResponse>> {
    decide(state, id, Decision::Approve, body, "投稿已通过，教师已添加").await
}

/// Reject a submission
#[utoipa::path(
    post,
    path = "/api/admin/submissions/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Submission id")),
    request_body(content = DecisionRequest, description = "Optional admin note"),
    responses(
        (status = 200, description = "Submission rejected", body = DecisionResponse),
        (status = 400, description = "Already processed"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn reject_submission(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    body: Option<Json<DecisionRequest>>,
) -> AppResult<ApiResponse<DecisionResponse>> {
    decide(state, id, Decision::Reject, body, "投稿已拒绝").await
}

async fn decide(
    state: AppState,
    id: Uuid,
    decision: Decision,
    body: Option<Json<DecisionRequest>>,
    message: &str,
) -> AppResult<ApiResponse<DecisionResponse>> {
    let note = body.and_then(|Json(request)| request.admin_note);
    let outcome = state.moderation_service.decide(id, decision, note).await?;

    Ok(ApiResponse::with_message(
        DecisionResponse::from(outcome),
        message,
    ))
}
