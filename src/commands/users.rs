//! Users command - Role management from the command line.
//!
//! There is no HTTP route for granting the admin role, so the first
//! administrator is promoted here.

use crate::cli::args::{UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::container::{ServiceContainer, Services};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let services = Services::from_connection(db.get_connection(), &config);

    let (username, role) = match args.action {
        UsersAction::Promote { username } => (username, UserRole::Admin),
        UsersAction::Demote { username } => (username, UserRole::User),
    };

    let user = services.users().set_role(&username, role).await?;
    tracing::info!(user_id = %user.id, username = %user.username, role = %user.role.as_str(), "Role updated");
    println!("{}: {}", user.username, user.role.as_str());

    Ok(())
}
