//! Rating handlers.

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
use crate::domain::RatingView;
use crate::errors::AppResult;
use crate::services::RatingSubmission;
use crate::types::{ApiResponse, Created};

/// Rating submission request.
///
/// `teacherId` and `rating` are kept as raw JSON so that wrongly typed
/// values reach the ledger and get the same reply as malformed ones.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    #[schema(value_type = Option<String>, example = "3f1c2a9e-8d4b-4c1e-9a7f-2b6d5e4c3a21")]
    pub teacher_id: Option<Value>,
    /// Integer score from 1 to 5
    #[schema(value_type = Option<u8>, example = 4)]
    pub rating: Option<Value>,
    /// 10 to 32768 characters after trimming
    #[schema(example = "讲课清楚，作业量适中")]
    pub comment: Option<String>,
    pub is_anonymous: Option<bool>,
}

/// Authenticated rating routes
pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_rating))
        .route("/my", get(my_ratings))
}

/// Rate a teacher
#[utoipa::path(
    post,
    path = "/api/ratings",
    tag = "Ratings",
    security(("bearer_auth" = [])),
    request_body = SubmitRatingRequest,
    responses(
        (status = 201, description = "Rating submitted successfully", body = RatingView),
        (status = 400, description = "Invalid teacher reference"),
        (status = 401, description = "Missing token, invalid score or comment, or duplicate rating"),
        (status = 403, description = "Teacher is not active"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn submit_rating(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<SubmitRatingRequest>,
) -> AppResult<Created<RatingView>> {
    let rating = state
        .rating_service
        .submit(
            current_user.id,
            RatingSubmission {
                teacher_id: json_text(payload.teacher_id),
                score: payload.rating,
                comment: payload.comment,
                is_anonymous: payload.is_anonymous.unwrap_or(false),
            },
        )
        .await?;

    Ok(Created(ApiResponse::with_message(
        RatingView::full(rating),
        "Rating submitted successfully",
    )))
}

/// List the caller's ratings
#[utoipa::path(
    get,
    path = "/api/ratings/my",
    tag = "Ratings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own ratings, newest first", body = [RatingView]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn my_ratings(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<Vec<RatingView>>> {
    let ratings = state.rating_service.list_for_user(current_user.id).await?;
    Ok(ApiResponse::success(ratings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_keeps_raw_json() {
        let payload: SubmitRatingRequest = serde_json::from_value(serde_json::json!({
            "teacherId": "abc",
            "rating": "five",
            "comment": "long enough comment"
        }))
        .unwrap();

        assert_eq!(payload.rating, Some(Value::String("five".to_string())));
        assert_eq!(payload.is_anonymous, None);
    }

    #[test]
    fn test_numeric_teacher_id_reads_as_absent() {
        let payload: SubmitRatingRequest = serde_json::from_value(serde_json::json!({
            "teacherId": 123,
            "rating": 5
        }))
        .unwrap();

        assert_eq!(json_text(payload.teacher_id), None);
    }
}
