//! Domain-level constants.
//!
//! These constants define business rules and access requirements.

// =============================================================================
// Capabilities
// =============================================================================

/// Capability required to search and list users
pub const CAP_FIND_USER: &str = "find_user";

/// Capability required to delete users
pub const CAP_DELETE_USER: &str = "delete_user";

// =============================================================================
// User Roles
// =============================================================================

/// Role held by every signed-in user
pub const ROLE_AUTHENTICATED: &str = "authenticated";

/// Administrator role, granted every capability
pub const ROLE_ADMINISTRATOR: &str = "administrator";

// =============================================================================
// Listing
// =============================================================================

/// Upper bound used by `list_all` when the caller does not give one
pub const DEFAULT_LIST_ALL_CAP: u64 = 99_999;

/// Default number of records per listing page
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Maximum number of records a single listing page may return
pub const MAX_PAGE_LIMIT: u64 = 100;
