//! Shared fixtures: an in-memory SQLite database with the users schema.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use common::DatabaseConfig;
use domain::{NewUser, User};
use user_service_lib::infra::Database;
use user_service_lib::repository::entities::user;
use user_service_lib::repository::UserStore;

pub async fn test_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    Database::connect(&config)
        .await
        .expect("in-memory database")
        .get_connection()
}

pub fn store(db: &DatabaseConnection) -> Arc<UserStore> {
    Arc::new(UserStore::new(db.clone()))
}

pub fn new_user(username: &str, display_name: &str) -> User {
    User::new(NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        display_name: display_name.to_string(),
    })
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// Insert a row with a fixed id and creation time.
pub async fn seed(
    db: &DatabaseConnection,
    id: i64,
    display_name: &str,
    full_name: &str,
    created_at: DateTime<Utc>,
) {
    user::ActiveModel {
        id: Set(id),
        username: Set(format!("user{}", id)),
        email: Set(format!("user{}@example.com", id)),
        display_name: Set(display_name.to_string()),
        full_name: Set(full_name.to_string()),
        biography: Set(String::new()),
        gender: Set(String::new()),
        active: Set(id % 2 == 0),
        blocked: Set(false),
        language: Set("en".to_string()),
        confirm_email: Set(String::new()),
        accept_terms: Set(true),
        birthdate: Set(String::new()),
        phone: Set(String::new()),
        roles: Set(r#"["authenticated"]"#.to_string()),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("seed user");
}
