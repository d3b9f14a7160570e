//! Shared request/response types.

mod pagination;
mod response;

pub use pagination::{PageRequest, Paginated, PaginationMeta, PaginationParams};
pub use response::{ApiResponse, Created};
