//! Teacher proposal handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::handlers::json_text;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Submission;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Proposal for a teacher not yet in the directory
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProposeTeacherRequest {
    /// Raw JSON; anything but a string is treated as missing
    #[schema(value_type = Option<String>, example = "李老师")]
    pub name: Option<Value>,
    #[schema(example = "高等数学")]
    pub description: Option<String>,
}

/// Authenticated submission routes
pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(propose_teacher))
        .route("/my", get(my_submissions))
}

/// Propose a new teacher
#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "Submissions",
    security(("bearer_auth" = [])),
    request_body = ProposeTeacherRequest,
    responses(
        (status = 201, description = "Submission pending review", body = Submission),
        (status = 400, description = "Missing name or teacher already listed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 429, description = "Too many submissions")
    )
)]
pub async fn propose_teacher(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ProposeTeacherRequest>,
) -> AppResult<Created<Submission>> {
    let submission = state
        .moderation_service
        .propose(current_user.id, json_text(payload.name), payload.description)
        .await?;

    Ok(Created(ApiResponse::with_message(
        submission,
        "投稿成功，等待审核",
    )))
}

/// List the caller's submissions
#[utoipa::path(
    get,
    path = "/api/submissions/my",
    tag = "Submissions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own submissions, newest first", body = [Submission]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn my_submissions(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Submission>>> {
    let submissions = state.moderation_service.list_mine(current_user.id).await?;
    Ok(ApiResponse::success(submissions))
}
