//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, rating_handler, submission_handler, teacher_handler,
};
use crate::domain::{
    Profile, RatingView, Submission, SubmissionStatus, TeacherDetail, TeacherSummary,
    UserResponse, UserRole,
};
use crate::types::PaginationMeta;

/// OpenAPI documentation for the teacher ratings service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Teacher Ratings API",
        version = "0.1.0",
        description = "Rate teachers, propose new ones and moderate the directory"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::get_profile,
        auth_handler::update_profile,
        // Directory endpoints
        teacher_handler::list_teachers,
        teacher_handler::get_teacher,
        teacher_handler::list_teacher_ratings,
        teacher_handler::create_teacher,
        // Rating endpoints
        rating_handler::submit_rating,
        rating_handler::my_ratings,
        // Submission endpoints
        submission_handler::propose_teacher,
        submission_handler::my_submissions,
        // Admin endpoints
        admin_handler::list_all_teachers,
        admin_handler::admin_create_teacher,
        admin_handler::approve_teacher,
        admin_handler::deactivate_teacher,
        admin_handler::delete_teacher,
        admin_handler::list_users,
        admin_handler::toggle_user,
        admin_handler::list_all_ratings,
        admin_handler::delete_rating,
        admin_handler::list_pending_submissions,
        admin_handler::approve_submission,
        admin_handler::reject_submission,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            Profile,
            UserResponse,
            TeacherSummary,
            TeacherDetail,
            RatingView,
            Submission,
            SubmissionStatus,
            PaginationMeta,
            // Request and response bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::ProfileNames,
            auth_handler::UpdateProfileRequest,
            teacher_handler::CreateTeacherRequest,
            rating_handler::SubmitRatingRequest,
            submission_handler::ProposeTeacherRequest,
            admin_handler::DecisionRequest,
            admin_handler::DecisionResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and profile"),
        (name = "Teachers", description = "Public teacher directory"),
        (name = "Ratings", description = "Scores and comments on teachers"),
        (name = "Submissions", description = "Proposals for new teachers"),
        (name = "Admin", description = "Directory, account and moderation management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
