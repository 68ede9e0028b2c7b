//! User Service - operator CLI for user records.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain::UserResponse;
use user_service_lib::access::{AllowAll, RequestContext};
use user_service_lib::config::UserServiceConfig;
use user_service_lib::query::{FieldFilter, ListUsersRequest};
use user_service_lib::service::UserService;
use user_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User records and listing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and page through users, printed as JSON
    List {
        /// Free-text term matched against display and full name
        #[arg(long)]
        q: Option<String>,
        /// Ordering, e.g. "displayName asc"
        #[arg(long)]
        order: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
        /// Structured filter `<field>[_<op>]=<value>`, repeatable
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<FieldFilter>,
    },
    /// Show one user by id, username or email
    Show { key: String },
    /// Permanently delete a user by id
    Delete { id: String },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

fn parse_filter(raw: &str) -> Result<FieldFilter, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <field>=<value>, got '{}'", raw))?;
    Ok(FieldFilter::from_param(key.trim(), value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_service_lib::run_migrations(migrate_action).await?;
        }
        command => run_user_command(command).await?,
    }

    Ok(())
}

async fn run_user_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let users = user_service_lib::connect(&config, Arc::new(AllowAll)).await?;

    match command {
        Commands::List {
            q,
            order,
            limit,
            offset,
            filters,
        } => {
            let mut request = ListUsersRequest {
                q,
                order,
                limit,
                offset,
                ..Default::default()
            };
            for filter in filters {
                request.filters.push(filter);
            }

            let page = users
                .list_users(&RequestContext::anonymous(), &request)
                .await
                .map_err(|e| e.user_message())?
                .map(UserResponse::from);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Show { key } => {
            let user = users
                .get_user_by_key(&key)
                .await
                .map_err(|e| e.user_message())?;
            println!("{}", serde_json::to_string_pretty(&UserResponse::from(user))?);
        }
        Commands::Delete { id } => {
            let user = users
                .get_user_by_id_text(&id)
                .await
                .map_err(|e| e.user_message())?;
            users
                .delete_user(&RequestContext::anonymous(), user.id())
                .await
                .map_err(|e| e.user_message())?;
            tracing::info!(user_id = user.id(), "Deleted user");
        }
        Commands::Migrate { .. } => {}
    }

    Ok(())
}
