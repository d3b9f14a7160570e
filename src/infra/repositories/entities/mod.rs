//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod rating;
pub mod submission;
pub mod teacher;
pub mod user;
