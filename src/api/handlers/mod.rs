//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod rating_handler;
pub mod submission_handler;
pub mod teacher_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::{auth_routes, profile_routes};
pub use rating_handler::rating_routes;
pub use submission_handler::submission_routes;
pub use teacher_handler::{teacher_admin_routes, teacher_routes};

use serde_json::Value;

/// String content of a loosely typed body field; any other JSON type reads as absent.
pub(crate) fn json_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}
