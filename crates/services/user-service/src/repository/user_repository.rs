//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::entities::user::{self, Entity as UserEntity};
use crate::query::UserQuery;
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>>;

    /// Find the user whose username or email equals `term`
    async fn find_by_username_or_email(&self, term: &str) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Users ordered by display name then id, at most `max_count` of them
    async fn list_all(&self, max_count: u64) -> AppResult<Vec<User>>;

    /// Insert when the user has no id yet, update otherwise.
    ///
    /// Returns the stored record with id and timestamps assigned.
    async fn save(&self, user: User) -> AppResult<User>;

    /// Permanently delete the user
    async fn delete(&self, user: &User) -> AppResult<()>;

    /// Execute a listing query: filter, order and window
    async fn search(&self, query: &UserQuery) -> AppResult<Vec<User>>;

    /// Count users matching `condition`, ignoring any window
    async fn count(&self, condition: &Condition) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_id(id: u64) -> AppResult<i64> {
    i64::try_from(id).map_err(|_| AppError::Format(format!("identifier {} is out of range", id)))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(db_id(id)?)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username_or_email(&self, term: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(term))
                    .add(user::Column::Email.eq(term)),
            )
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn list_all(&self, max_count: u64) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::DisplayName)
            .order_by_asc(user::Column::Id)
            .limit(max_count)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let now = Utc::now();
        let mut snapshot = user.to_snapshot();
        snapshot.updated_at = now;

        let model = if user.is_new() {
            snapshot.created_at = now;
            let model = user::insert_model(snapshot)
                .insert(&self.db)
                .await
                .map_err(AppError::from)?;
            tracing::info!(user_id = model.id, username = %model.username, "User created");
            model
        } else {
            let id = db_id(snapshot.id)?;
            match user::update_model(snapshot, id).update(&self.db).await {
                Ok(model) => model,
                Err(DbErr::RecordNotUpdated) => return Err(AppError::NotFound),
                Err(e) => return Err(AppError::from(e)),
            }
        };

        Ok(User::from(model))
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        let result = UserEntity::delete_by_id(db_id(user.id())?)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tracing::info!(user_id = user.id(), "User deleted");
        Ok(())
    }

    async fn search(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let mut select = UserEntity::find().filter(query.condition.clone());
        for (column, order) in &query.order {
            select = select.order_by(*column, order.clone());
        }

        let models = select
            .limit(query.window.limit)
            .offset(query.window.offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self, condition: &Condition) -> AppResult<u64> {
        UserEntity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
