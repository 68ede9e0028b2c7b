//! Service layer - CRUD use cases and the listing engine.

mod listing;
mod user_service;

pub use listing::UserListing;
pub use user_service::{UserManager, UserService};
