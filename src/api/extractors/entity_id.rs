//! Path id extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;

/// UUID taken from the `:id` path segment.
///
/// Anything that does not parse is rejected before the handler runs with
/// 400 `Invalid id format`.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidReference("id"))?;

        Uuid::parse_str(raw.trim())
            .map(EntityId)
            .map_err(|_| AppError::InvalidReference("id"))
    }
}
