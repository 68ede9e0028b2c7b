//! User listing - filtered, ordered, paginated search with a total count.

use std::sync::Arc;

use common::{AppError, AppResult, ForbiddenPolicy, Paginated};
use domain::{User, CAP_FIND_USER};

use crate::access::{Authorizer, RequestContext};
use crate::query::{ListUsersRequest, UserQueryBuilder};
use crate::repository::UserRepository;

/// Runs listing requests against the repository.
pub struct UserListing {
    repo: Arc<dyn UserRepository>,
    authorizer: Arc<dyn Authorizer>,
    builder: UserQueryBuilder,
}

impl UserListing {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        authorizer: Arc<dyn Authorizer>,
        builder: UserQueryBuilder,
    ) -> Self {
        Self {
            repo,
            authorizer,
            builder,
        }
    }

    /// One page of matching users plus the size of the whole matching set.
    ///
    /// Without the `find_user` capability the result depends on the
    /// configured [`ForbiddenPolicy`]: an empty page, or `AppError::Forbidden`.
    /// Storage failures surface as `AppError::Query`.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        request: &ListUsersRequest,
    ) -> AppResult<Paginated<User>> {
        if !self.authorizer.can(ctx, CAP_FIND_USER) {
            return match self.builder.config().forbidden_policy {
                ForbiddenPolicy::Empty => {
                    tracing::info!(
                        user_id = ?ctx.user_id,
                        "Caller lacks {}, returning empty listing",
                        CAP_FIND_USER
                    );
                    Ok(Paginated::empty(self.builder.window(request)))
                }
                ForbiddenPolicy::Reject => Err(AppError::Forbidden),
            };
        }

        let query = self.builder.build(request);

        // Read-only and independent: run both at once.
        let (records, total) = tokio::try_join!(
            self.repo.search(&query),
            self.repo.count(&query.condition)
        )
        .map_err(AppError::into_query_error)?;

        tracing::debug!(
            returned = records.len(),
            total,
            limit = query.window.limit,
            offset = query.window.offset,
            "User listing executed"
        );

        Ok(Paginated::new(records, query.window, total))
    }
}
