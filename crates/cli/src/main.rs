//! Frameshop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! fs-cli migrate
//!
//! # Grant or revoke a role
//! fs-cli role grant -e owner@example.com -r admin
//! fs-cli role revoke -e owner@example.com -r admin
//!
//! # Insert default store settings (never overwrites)
//! fs-cli settings seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use frameshop_core::AppRole;

mod commands;

#[derive(Parser)]
#[command(name = "fs-cli")]
#[command(author, version, about = "Frameshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
    /// Manage store settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Grant a role to an existing account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Role (`admin`, `user`)
        #[arg(short, long, default_value = "admin")]
        role: AppRole,
    },
    /// Revoke a role from an account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Role (`admin`, `user`)
        #[arg(short, long, default_value = "admin")]
        role: AppRole,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Insert defaults for settings that are not set
    Seed,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Role { action } => match action {
            RoleAction::Grant { email, role } => commands::role::grant(&email, role).await,
            RoleAction::Revoke { email, role } => commands::role::revoke(&email, role).await,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Seed => commands::settings::seed().await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_grant() {
        let cli = Cli::try_parse_from(["fs-cli", "role", "grant", "-e", "owner@example.com"])
            .expect("parse");
        match cli.command {
            Commands::Role {
                action: RoleAction::Grant { email, role },
            } => {
                assert_eq!(email, "owner@example.com");
                assert_eq!(role, AppRole::Admin);
            }
            _ => panic!("expected role grant"),
        }
    }

    #[test]
    fn test_parse_role_revoke_with_role() {
        let cli = Cli::try_parse_from([
            "fs-cli",
            "role",
            "revoke",
            "--email",
            "owner@example.com",
            "--role",
            "user",
        ])
        .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Role {
                action: RoleAction::Revoke {
                    role: AppRole::User,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(
            Cli::try_parse_from(["fs-cli", "role", "grant", "-e", "a@b.com", "-r", "owner"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_settings_seed_and_migrate() {
        assert!(matches!(
            Cli::try_parse_from(["fs-cli", "settings", "seed"])
                .expect("parse")
                .command,
            Commands::Settings {
                action: SettingsAction::Seed
            }
        ));
        assert!(matches!(
            Cli::try_parse_from(["fs-cli", "migrate"]).expect("parse").command,
            Commands::Migrate
        ));
    }
}
