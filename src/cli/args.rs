//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Teacher ratings service
#[derive(Parser, Debug)]
#[command(name = "teacher-ratings")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage user roles
    Users(UsersArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to [default: SERVER_HOST or 0.0.0.0]
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on [default: SERVER_PORT or 5000]
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Role management actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// Grant the admin role
    Promote {
        /// Username of the account
        username: String,
    },
    /// Revoke the admin role
    Demote {
        /// Username of the account
        username: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["teacher-ratings", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, None);
                assert_eq!(args.port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_promote_takes_username() {
        let cli = Cli::try_parse_from(["teacher-ratings", "-v", "users", "promote", "alice"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Users(UsersArgs {
                action: UsersAction::Promote { username },
            }) => assert_eq!(username, "alice"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
