//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The user record defined here is shared by the repository, the listing
//! engine and the CLI.

pub mod constants;
pub mod error;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use user::{parse_id, NewUser, User, UserResponse, UserSnapshot};
