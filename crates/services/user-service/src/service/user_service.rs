//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt, Paginated};
use domain::{parse_id, NewUser, User, CAP_DELETE_USER, DEFAULT_LIST_ALL_CAP};

use super::listing::UserListing;
use crate::access::{Authorizer, RequestContext};
use crate::query::ListUsersRequest;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: u64) -> AppResult<User>;

    /// Get user by textual ID (`Format` error when it does not parse)
    async fn get_user_by_id_text(&self, id: &str) -> AppResult<User>;

    /// Get user whose username or email equals `term`
    async fn get_user_by_username_or_email(&self, term: &str) -> AppResult<User>;

    /// Get user by id, username or email.
    ///
    /// A numeric key is tried as an id first; when no record has that id it
    /// is looked up as a username or email.
    async fn get_user_by_key(&self, key: &str) -> AppResult<User>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// List users by display name, capped at `max_count` (default 99 999)
    async fn list_all_users(&self, max_count: Option<u64>) -> AppResult<Vec<User>>;

    /// Filtered, ordered, paginated listing with a total count
    async fn list_users(
        &self,
        ctx: &RequestContext,
        request: &ListUsersRequest,
    ) -> AppResult<Paginated<User>>;

    /// Create a new user, rejecting taken usernames and emails
    async fn create_user(&self, data: NewUser) -> AppResult<User>;

    /// Persist changes to a user (inserts when it has no id yet)
    async fn save_user(&self, user: User) -> AppResult<User>;

    /// Permanently delete user; the caller needs `delete_user`
    async fn delete_user(&self, ctx: &RequestContext, id: u64) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    authorizer: Arc<dyn Authorizer>,
    listing: UserListing,
}

impl UserManager {
    /// Create new user service instance with repository and listing engine
    pub fn new(
        repo: Arc<dyn UserRepository>,
        authorizer: Arc<dyn Authorizer>,
        listing: UserListing,
    ) -> Self {
        Self {
            repo,
            authorizer,
            listing,
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: u64) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_id_text(&self, id: &str) -> AppResult<User> {
        let id = parse_id(id)?;
        self.get_user(id).await
    }

    async fn get_user_by_username_or_email(&self, term: &str) -> AppResult<User> {
        self.repo
            .find_by_username_or_email(term)
            .await?
            .ok_or_not_found()
    }

    async fn get_user_by_key(&self, key: &str) -> AppResult<User> {
        if let Ok(id) = key.parse::<u64>() {
            match self.get_user(id).await {
                Err(AppError::NotFound) => {}
                found => return found,
            }
        }
        self.get_user_by_username_or_email(key).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.find_by_email(email).await?.ok_or_not_found()
    }

    async fn list_all_users(&self, max_count: Option<u64>) -> AppResult<Vec<User>> {
        self.repo
            .list_all(max_count.unwrap_or(DEFAULT_LIST_ALL_CAP))
            .await
    }

    async fn list_users(
        &self,
        ctx: &RequestContext,
        request: &ListUsersRequest,
    ) -> AppResult<Paginated<User>> {
        self.listing.list_users(ctx, request).await
    }

    async fn create_user(&self, data: NewUser) -> AppResult<User> {
        if self
            .repo
            .find_by_username_or_email(&data.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username"));
        }
        if self.repo.find_by_email(&data.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        self.repo.save(User::new(data)).await
    }

    async fn save_user(&self, user: User) -> AppResult<User> {
        self.repo.save(user).await
    }

    async fn delete_user(&self, ctx: &RequestContext, id: u64) -> AppResult<()> {
        if !self.authorizer.can(ctx, CAP_DELETE_USER) {
            tracing::warn!(user_id = id, caller = ?ctx.user_id, "Delete refused");
            return Err(AppError::Forbidden);
        }
        let user = self.get_user(id).await?;
        self.repo.delete(&user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ListingConfig;
    use mockall::predicate::eq;

    use crate::access::{AllowAll, RolePermissions};
    use crate::query::UserQueryBuilder;
    use crate::repository::MockUserRepository;

    fn new_user() -> NewUser {
        NewUser {
            username: "dave".to_string(),
            email: "dave@example.com".to_string(),
            display_name: "Dave".to_string(),
        }
    }

    fn stored_user(id: u64) -> User {
        let mut user = User::new(new_user());
        user.set_id(&id.to_string()).unwrap();
        user
    }

    fn manager_with(repo: MockUserRepository, authorizer: Arc<dyn Authorizer>) -> UserManager {
        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let listing = UserListing::new(
            repo.clone(),
            authorizer.clone(),
            UserQueryBuilder::with_config(ListingConfig::default()),
        );
        UserManager::new(repo, authorizer, listing)
    }

    fn manager(repo: MockUserRepository) -> UserManager {
        manager_with(repo, Arc::new(AllowAll))
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().with(eq(9u64)).returning(|_| Ok(None));

        let result = manager(repo).get_user(9).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_user_by_id_text_rejects_malformed_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();

        let result = manager(repo).get_user_by_id_text("12abc").await;
        assert!(matches!(result, Err(AppError::Format(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_id_text_parses_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(12u64))
            .returning(|id| Ok(Some(stored_user(id))));

        let user = manager(repo).get_user_by_id_text("12").await.unwrap();
        assert_eq!(user.id(), 12);
    }

    #[tokio::test]
    async fn test_get_user_by_key_prefers_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(42u64))
            .returning(|id| Ok(Some(stored_user(id))));
        repo.expect_find_by_username_or_email().never();

        let user = manager(repo).get_user_by_key("42").await.unwrap();
        assert_eq!(user.id(), 42);
    }

    #[tokio::test]
    async fn test_get_user_by_key_numeric_username_falls_back() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().with(eq(2024u64)).returning(|_| Ok(None));
        repo.expect_find_by_username_or_email()
            .with(eq("2024"))
            .times(1)
            .returning(|_| Ok(Some(stored_user(7))));

        let user = manager(repo).get_user_by_key("2024").await.unwrap();
        assert_eq!(user.id(), 7);
    }

    #[tokio::test]
    async fn test_get_user_by_key_missing_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_find_by_username_or_email().returning(|_| Ok(None));

        let result = manager(repo).get_user_by_key("nobody@example.com").await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_all_users_uses_default_cap() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_all()
            .with(eq(DEFAULT_LIST_ALL_CAP))
            .times(1)
            .returning(|_| Ok(vec![]));

        let users = manager(repo).list_all_users(None).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_create_user_rejects_taken_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username_or_email()
            .returning(|_| Ok(Some(stored_user(1))));
        repo.expect_save().never();

        let result = manager(repo).create_user(new_user()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_user_saves_new_record() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username_or_email().returning(|_| Ok(None));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_save()
            .withf(|user| user.is_new() && user.username() == "dave")
            .times(1)
            .returning(|_| Ok(stored_user(1)));

        let user = manager(repo).create_user(new_user()).await.unwrap();
        assert_eq!(user.id(), 1);
    }

    #[tokio::test]
    async fn test_delete_user_missing_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let result = manager(repo)
            .delete_user(&RequestContext::anonymous(), 3)
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_user_requires_capability() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_delete().never();

        let users = manager_with(repo, Arc::new(RolePermissions::with_defaults()));
        let ctx = RequestContext::with_roles([domain::ROLE_AUTHENTICATED]);
        let result = users.delete_user(&ctx, 3).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_delete_user_with_capability_removes_record() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(3u64))
            .returning(|id| Ok(Some(stored_user(id))));
        repo.expect_delete()
            .withf(|user| user.id() == 3)
            .times(1)
            .returning(|_| Ok(()));

        let perms = RolePermissions::with_defaults().grant("moderator", CAP_DELETE_USER);
        let users = manager_with(repo, Arc::new(perms));
        let ctx = RequestContext::with_roles(["moderator"]);
        assert!(users.delete_user(&ctx, 3).await.is_ok());
    }
}
