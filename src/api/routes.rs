//! Application route configuration.

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, auth_routes, profile_routes, rating_routes, submission_routes,
    teacher_admin_routes, teacher_routes,
};
use super::middleware::{
    admin_middleware, auth_middleware, rate_limit_auth_middleware, rate_limit_middleware,
    rate_limit_submission_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes(&state))
        .fallback(route_not_found)
        // Global middleware
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        // Login and registration are public; profile needs a token. All share the auth tier.
        .nest(
            "/auth",
            auth_routes()
                .merge(profile_routes().route_layer(authenticated()))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_auth_middleware,
                )),
        )
        // Directory reads are public; creating a teacher is admin-only
        .nest(
            "/teachers",
            teacher_routes().merge(
                teacher_admin_routes()
                    .route_layer(middleware::from_fn(admin_middleware))
                    .route_layer(authenticated()),
            ),
        )
        .nest("/ratings", rating_routes().route_layer(authenticated()))
        .nest(
            "/submissions",
            submission_routes()
                .route_layer(authenticated())
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_submission_middleware,
                )),
        )
        .nest(
            "/admin",
            admin_routes()
                .route_layer(middleware::from_fn(admin_middleware))
                .route_layer(authenticated()),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to the Teacher Ratings API"
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_degraded(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = ServiceStatus::from_result(state.database.ping().await);

    // Without a limiter there is nothing to ping
    let redis_status = match &state.rate_limiter {
        Some(limiter) => ServiceStatus::from_result(limiter.ping().await),
        None => ServiceStatus {
            status: "disabled",
            error: None,
        },
    };

    let degraded = db_status.is_degraded() || redis_status.is_degraded();

    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        services: ServiceHealth {
            database: db_status,
            redis: redis_status,
        },
    };

    let status_code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status_code, Json(response))
}
