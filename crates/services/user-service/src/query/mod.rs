//! Request-to-query translation for the user listing.

mod builder;
mod field;
mod filter;
mod request;

pub use builder::{search_condition, UserQuery, UserQueryBuilder};
pub use field::UserField;
pub use filter::{
    ColumnFilterAdapter, FieldFilter, FilterAdapter, FilterCriteria, FilterError, FilterOp,
};
pub use request::{ListUsersRequest, OrderDirective, SortDirection};
