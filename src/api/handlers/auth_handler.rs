//! Authentication handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::TOKEN_TYPE_BEARER;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{Credentials, NewAccount, ProfileUpdate};
use crate::types::{ApiResponse, Created};

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+$").expect("username pattern is a valid regex")
});

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 3 to 30 letters or digits
    #[validate(
        required(message = "Username is required"),
        length(min = 3, max = 30, message = "Invalid username"),
        regex(path = *USERNAME_PATTERN, message = "Invalid username")
    )]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[validate(
        required(message = "Email address is required"),
        email(message = "Invalid email address")
    )]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[validate(
        required(message = "Password is required"),
        length(min = 6, max = 100, message = "Password must be between 6 and 100 characters")
    )]
    #[schema(example = "secret123", min_length = 6, max_length = 100)]
    pub password: Option<String>,
}

/// User login request. Either `email` or `username` identifies the account.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "secret123")]
    pub password: Option<String>,
}

/// Token issued at login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed identity token, valid for 12 hours
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub jwt: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 43200)]
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Profile names
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNames {
    #[validate(length(max = 50, message = "Invalid firstName"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Invalid lastName"))]
    pub last_name: Option<String>,
}

/// Profile update request; omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: Option<String>,
    #[validate(nested)]
    pub profile: Option<ProfileNames>,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Authenticated profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid field or email/username already taken"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let account = NewAccount {
        username: payload.username.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
    };
    let user = state.auth_service.register(account).await?;

    Ok(Created(ApiResponse::with_message(
        UserResponse::from(user),
        "User registered successfully",
    )))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Missing identifier, unknown user, wrong password or banned user"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let session = state
        .auth_service
        .login(Credentials {
            email: payload.email,
            username: payload.username,
            password: payload.password,
        })
        .await?;

    Ok(ApiResponse::with_message(
        LoginResponse {
            jwt: session.token.token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: session.token.expires_in,
            user: UserResponse::from(session.user),
        },
        "Login successful",
    ))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.auth_service.profile(current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Update the caller's email, password or names
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid field or email already in use"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let (first_name, last_name) = payload
        .profile
        .map(|p| (p.first_name, p.last_name))
        .unwrap_or_default();

    let user = state
        .auth_service
        .update_profile(
            current_user.id,
            ProfileUpdate {
                email: payload.email,
                password: payload.password,
                first_name,
                last_name,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "Profile updated successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_register_rules() {
        assert!(register("alice01", "alice@example.com", "secret1").validate().is_ok());
        assert!(register("al", "alice@example.com", "secret1").validate().is_err());
        assert!(register("alice_01", "alice@example.com", "secret1").validate().is_err());
        assert!(register("alice", "not-an-email", "secret1").validate().is_err());
        assert!(register("alice", "alice@example.com", "12345").validate().is_err());

        let missing = RegisterRequest {
            username: None,
            email: Some("alice@example.com".to_string()),
            password: Some("secret1".to_string()),
        };
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_profile_names_are_bounded() {
        let request = UpdateProfileRequest {
            email: None,
            password: None,
            profile: Some(ProfileNames {
                first_name: Some("x".repeat(51)),
                last_name: None,
            }),
        };
        assert!(request.validate().is_err());
    }
}
