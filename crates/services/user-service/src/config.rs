//! User service configuration.

use std::env;

use common::{DatabaseConfig, ForbiddenPolicy, ListingConfig};

/// User service configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    pub database: DatabaseConfig,
    pub listing: ListingConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let db_defaults = DatabaseConfig::default();
        let list_defaults = ListingConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(db_defaults.url),
                max_connections: env_parse("USER_SERVICE_MAX_CONNECTIONS")
                    .unwrap_or(db_defaults.max_connections),
                min_connections: env_parse("USER_SERVICE_MIN_CONNECTIONS")
                    .unwrap_or(db_defaults.min_connections),
            },
            listing: ListingConfig {
                default_limit: env_parse("USER_LIST_DEFAULT_LIMIT")
                    .unwrap_or(list_defaults.default_limit),
                max_limit: env_parse("USER_LIST_MAX_LIMIT").unwrap_or(list_defaults.max_limit),
                forbidden_policy: env_parse::<ForbiddenPolicy>("USER_LIST_FORBIDDEN_POLICY")
                    .unwrap_or(list_defaults.forbidden_policy),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}
