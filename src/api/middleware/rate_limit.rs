//! Rate limiting middleware backed by the configured RateLimiter.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_SUBMISSION_REQUESTS, RATE_LIMIT_SUBMISSION_WINDOW_SECONDS,
    RATE_LIMIT_WINDOW_SECONDS,
};
use crate::errors::AppError;

/// One fixed-window limit.
#[derive(Debug, Clone, Copy)]
struct RateTier {
    key: &'static str,
    max_requests: u64,
    window_seconds: u64,
    message: &'static str,
}

const GENERAL: RateTier = RateTier {
    key: "general",
    max_requests: RATE_LIMIT_REQUESTS,
    window_seconds: RATE_LIMIT_WINDOW_SECONDS,
    message: "Too many requests, please try again later",
};

const AUTH: RateTier = RateTier {
    key: "auth",
    max_requests: RATE_LIMIT_AUTH_REQUESTS,
    window_seconds: RATE_LIMIT_AUTH_WINDOW_SECONDS,
    message: "Too many login attempts, please try again later",
};

const SUBMISSION: RateTier = RateTier {
    key: "submission",
    max_requests: RATE_LIMIT_SUBMISSION_REQUESTS,
    window_seconds: RATE_LIMIT_SUBMISSION_WINDOW_SECONDS,
    message: "Too many submissions, please try again later",
};

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn get_client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        // First IP in the chain is the original client
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

async fn enforce(
    state: &AppState,
    tier: RateTier,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return Ok(next.run(request).await);
    };

    let client_id = get_client_identifier(&request);
    let key = format!("{}:{}", tier.key, client_id);
    let rejected = AppError::TooManyRequests {
        message: tier.message,
        retry_after: tier.window_seconds,
    };

    let (count, allowed) = match limiter
        .hit(&key, tier.max_requests, tier.window_seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Fail closed: a broken backend must not lift the limit
            tracing::error!(error = %e, tier = tier.key, "Rate limit check failed - denying request");
            return Err(rejected);
        }
    };

    if !allowed {
        tracing::warn!(client = %client_id, tier = tier.key, count, "Rate limit exceeded");
        return Err(rejected);
    }

    let mut response = next.run(request).await;

    let remaining = tier.max_requests.saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(tier.max_requests));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}

/// General rate limiting for every `/api` route.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, GENERAL, request, next).await
}

/// Stricter rate limiting for authentication endpoints.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, AUTH, request, next).await
}

/// Limit on teacher proposals. Only `POST` requests are counted.
pub async fn rate_limit_submission_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }
    enforce(&state, SUBMISSION, request, next).await
}
