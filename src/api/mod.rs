//! HTTP surface of the teacher ratings service.
//!
//! Handlers for accounts, the teacher directory, ratings, submissions and
//! the admin console sit behind JWT authentication, role checks and tiered
//! rate limits.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
