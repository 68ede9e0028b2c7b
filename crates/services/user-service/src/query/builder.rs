//! Translates a listing request into storage-level clauses.
//!
//! The fetch query and the count query are built from one condition so the
//! total always describes the same set the page is cut from.

use std::sync::Arc;

use common::{ListingConfig, PageWindow};
use sea_orm::sea_query::{BinOper, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{Condition, Order};

use super::field::UserField;
use super::filter::{ColumnFilterAdapter, FilterAdapter};
use super::request::{ListUsersRequest, OrderDirective};
use crate::repository::entities::user::{Column, Entity as UserEntity};

/// Columns searched by the free-text term
const SEARCH_COLUMNS: [Column; 2] = [Column::DisplayName, Column::FullName];

/// Escape character for LIKE patterns; needs no quoting in any backend
const LIKE_ESCAPE: char = '!';

/// A fully built listing query.
#[derive(Debug, Clone)]
pub struct UserQuery {
    /// Filter shared by the fetch and the count
    pub condition: Condition,
    pub order: Vec<(Column, Order)>,
    /// Applied to the fetch only
    pub window: PageWindow,
}

/// Builds [`UserQuery`] values from requests.
#[derive(Clone)]
pub struct UserQueryBuilder {
    adapter: Arc<dyn FilterAdapter>,
    config: ListingConfig,
}

impl UserQueryBuilder {
    pub fn new(adapter: Arc<dyn FilterAdapter>, config: ListingConfig) -> Self {
        Self { adapter, config }
    }

    /// Builder using the allow-listed column adapter
    pub fn with_config(config: ListingConfig) -> Self {
        Self::new(Arc::new(ColumnFilterAdapter), config)
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn build(&self, request: &ListUsersRequest) -> UserQuery {
        UserQuery {
            condition: self.build_condition(request),
            order: self.ordering(request),
            window: self.window(request),
        }
    }

    /// AND of every adapter clause that applied and the free-text clause.
    ///
    /// Filters the adapter rejects are logged and skipped.
    pub fn build_condition(&self, request: &ListUsersRequest) -> Condition {
        let mut condition = Condition::all();

        for filter in &request.filters.clauses {
            match self.adapter.apply(filter, condition.clone()) {
                Ok(next) => condition = next,
                Err(e) => {
                    tracing::error!(
                        field = %filter.field,
                        op = filter.op.as_str(),
                        error = %e,
                        "Skipping request filter"
                    );
                }
            }
        }

        if let Some(q) = request.search_term() {
            condition = condition.add(search_condition(q));
        }

        condition
    }

    /// Requested ordering with an id tie-break, or the default
    /// `created_at DESC, id DESC`.
    pub fn ordering(&self, request: &ListUsersRequest) -> Vec<(Column, Order)> {
        let directive = request.order.as_deref().and_then(|raw| {
            let parsed = OrderDirective::parse(raw);
            if parsed.is_none() {
                tracing::debug!(order = raw, "Invalid order directive, using default ordering");
            }
            parsed
        });

        match directive {
            Some(d) => {
                let mut order = vec![(d.field.column(), d.direction.to_order())];
                if d.field != UserField::Id {
                    order.push((Column::Id, d.direction.to_order()));
                }
                order
            }
            None => vec![(Column::CreatedAt, Order::Desc), (Column::Id, Order::Desc)],
        }
    }

    /// Requested window with defaults filled in and the limit capped.
    pub fn window(&self, request: &ListUsersRequest) -> PageWindow {
        PageWindow::new(
            request.limit.unwrap_or(self.config.default_limit),
            request.offset.unwrap_or(0),
        )
        .clamped(self.config.max_limit)
    }
}

/// Case-insensitive substring match of `q` on display name OR full name.
pub fn search_condition(q: &str) -> Condition {
    SEARCH_COLUMNS
        .into_iter()
        .fold(Condition::any(), |cond, column| cond.add(contains_ci(column, q)))
}

/// `LOWER(col) LIKE LOWER('%needle%')`, so both sides fold case the same way.
fn contains_ci(column: Column, needle: &str) -> SimpleExpr {
    let pattern = SimpleExpr::from(Func::lower(Expr::val(format!("%{}%", escape_like(needle)))))
        .binary(BinOper::Escape, SimpleExpr::Constant(LIKE_ESCAPE.into()));
    Expr::expr(Func::lower(Expr::col((UserEntity, column)))).binary(BinOper::Like, pattern)
}

/// LIKE pattern whose escapes use [`LIKE_ESCAPE`]
pub(crate) fn escaped_like(pattern: String) -> LikeExpr {
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Escape `%` and `_` so they match literally
pub(crate) fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    use crate::query::filter::{FieldFilter, FilterOp};

    fn builder() -> UserQueryBuilder {
        UserQueryBuilder::with_config(ListingConfig::default())
    }

    fn names(order: Vec<(Column, Order)>) -> Vec<String> {
        order
            .into_iter()
            .map(|(column, dir)| format!("{:?} {:?}", column, dir))
            .collect()
    }

    fn where_sql(condition: Condition) -> String {
        UserEntity::find()
            .filter(condition)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off!"), "50!%!_off!!");
        assert_eq!(escape_like("alice"), "alice");
    }

    #[test]
    fn test_empty_request_has_no_filter() {
        let sql = where_sql(builder().build_condition(&ListUsersRequest::default()));
        assert!(!sql.contains("LIKE"), "{sql}");
        assert!(!sql.contains(" = "), "{sql}");
    }

    #[test]
    fn test_search_term_matches_either_name_case_insensitively() {
        let request = ListUsersRequest::default().with_q("Alice");
        let sql = where_sql(builder().build_condition(&request));

        assert!(
            sql.contains(r#"LOWER("users"."display_name") LIKE LOWER('%Alice%') ESCAPE '!'"#),
            "{sql}"
        );
        assert!(
            sql.contains(r#"LOWER("users"."full_name") LIKE LOWER('%Alice%') ESCAPE '!'"#),
            "{sql}"
        );
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn test_search_term_wildcards_are_escaped() {
        let request = ListUsersRequest::default().with_q("100%");
        let sql = where_sql(builder().build_condition(&request));

        assert!(sql.contains(r#"LIKE LOWER('%100!%%') ESCAPE '!'"#), "{sql}");
    }

    #[test]
    fn test_filters_and_search_are_combined_with_and() {
        let request = ListUsersRequest::default()
            .with_q("ali")
            .with_filter(FieldFilter::new("active", FilterOp::Eq, "true"));
        let sql = where_sql(builder().build_condition(&request));

        assert!(sql.contains(r#""users"."active" = TRUE AND ("#), "{sql}");
    }

    #[test]
    fn test_rejected_filters_are_skipped() {
        let request = ListUsersRequest::default()
            .with_filter(FieldFilter::new("password", FilterOp::Eq, "x"))
            .with_filter(FieldFilter::new("blocked", FilterOp::Eq, "false"));
        let sql = where_sql(builder().build_condition(&request));

        assert!(!sql.contains("password"), "{sql}");
        assert!(sql.contains(r#""users"."blocked" = FALSE"#), "{sql}");
    }

    #[test]
    fn test_default_ordering() {
        assert_eq!(
            names(builder().ordering(&ListUsersRequest::default())),
            ["CreatedAt Desc", "Id Desc"]
        );
    }

    #[test]
    fn test_invalid_order_falls_back_to_default() {
        let request = ListUsersRequest::default().with_order("roles desc");
        assert_eq!(
            names(builder().ordering(&request)),
            ["CreatedAt Desc", "Id Desc"]
        );
    }

    #[test]
    fn test_valid_order_adds_id_tie_break() {
        let request = ListUsersRequest::default().with_order("displayName asc");
        assert_eq!(
            names(builder().ordering(&request)),
            ["DisplayName Asc", "Id Asc"]
        );

        let request = ListUsersRequest::default().with_order("id desc");
        assert_eq!(names(builder().ordering(&request)), ["Id Desc"]);
    }

    #[test]
    fn test_window_defaults_and_cap() {
        let b = builder();
        assert_eq!(b.window(&ListUsersRequest::default()), PageWindow::new(20, 0));
        assert_eq!(
            b.window(&ListUsersRequest::default().with_window(10, 20)),
            PageWindow::new(10, 20)
        );
        assert_eq!(
            b.window(&ListUsersRequest::default().with_window(5000, 0)),
            PageWindow::new(100, 0)
        );
    }
}
