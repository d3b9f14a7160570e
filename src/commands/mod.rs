//! Implementations behind each CLI subcommand.

pub mod migrate;
pub mod serve;
pub mod users;
