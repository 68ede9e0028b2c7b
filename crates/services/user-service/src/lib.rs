//! User Service Library
//!
//! User records, their storage, and the request-driven listing engine
//! (free-text search, structured filters, ordering, pagination and a total
//! count behind a capability check).

pub mod access;
pub mod config;
pub mod infra;
pub mod query;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::access::Authorizer;
use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::query::UserQueryBuilder;
use crate::repository::{UserRepository, UserStore};
use crate::service::{UserListing, UserManager};

/// Wire repository, listing engine and service over one connection.
pub fn build_user_manager(
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
    config: &UserServiceConfig,
) -> UserManager {
    let repo: Arc<dyn UserRepository> = Arc::new(UserStore::new(db));
    let listing = UserListing::new(
        repo.clone(),
        authorizer.clone(),
        UserQueryBuilder::with_config(config.listing.clone()),
    );
    UserManager::new(repo, authorizer, listing)
}

/// Connect (applying pending migrations) and build the user service.
pub async fn connect(
    config: &UserServiceConfig,
    authorizer: Arc<dyn Authorizer>,
) -> Result<UserManager, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    Ok(build_user_manager(db.get_connection(), authorizer, config))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
