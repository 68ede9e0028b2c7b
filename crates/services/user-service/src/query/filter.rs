//! Structured request filters and the adapter that turns them into clauses.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, Value};
use thiserror::Error;

use super::builder::{escape_like, escaped_like};
use super::field::UserField;
use crate::repository::entities::user::Entity as UserEntity;

/// Comparison requested for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Contains,
    StartsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    /// Parameter-name suffixes, longest first so `_gte` wins over `_gt`.
    const SUFFIXES: [(&'static str, FilterOp); 9] = [
        ("_starts_with", FilterOp::StartsWith),
        ("_contains", FilterOp::Contains),
        ("_gte", FilterOp::Gte),
        ("_lte", FilterOp::Lte),
        ("_eq", FilterOp::Eq),
        ("_ne", FilterOp::Ne),
        ("_gt", FilterOp::Gt),
        ("_lt", FilterOp::Lt),
        ("_in", FilterOp::In),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "starts_with",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::In => "in",
        }
    }
}

/// One `<field>[_<op>]=<value>` request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Split a parameter name into field and operator (`eq` when no suffix).
    pub fn from_param(key: &str, value: &str) -> Self {
        for (suffix, op) in FilterOp::SUFFIXES {
            if let Some(field) = key.strip_suffix(suffix) {
                if !field.is_empty() {
                    return Self::new(field, op, value);
                }
            }
        }
        Self::new(key, FilterOp::Eq, value)
    }
}

/// Structured filters collected from a request, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub clauses: Vec<FieldFilter>,
}

impl FilterCriteria {
    pub fn push(&mut self, filter: FieldFilter) {
        self.clauses.push(filter);
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter field '{0}'")]
    UnknownField(String),

    #[error("operator '{op}' is not supported on field '{field}'")]
    UnsupportedOperator { field: String, op: &'static str },

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Adds storage-level clauses for structured request filters.
///
/// Each call handles one filter and returns the extended condition, or an
/// error that leaves the caller's condition as it was.
pub trait FilterAdapter: Send + Sync {
    fn apply(&self, filter: &FieldFilter, condition: Condition) -> Result<Condition, FilterError>;
}

/// Filter adapter over the [`UserField`] allow-list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnFilterAdapter;

impl FilterAdapter for ColumnFilterAdapter {
    fn apply(&self, filter: &FieldFilter, condition: Condition) -> Result<Condition, FilterError> {
        let field = UserField::from_name(&filter.field)
            .ok_or_else(|| FilterError::UnknownField(filter.field.clone()))?;
        let column = field.column();

        let unsupported = || FilterError::UnsupportedOperator {
            field: field.name().to_string(),
            op: filter.op.as_str(),
        };

        let expr = match filter.op {
            FilterOp::Eq => column.eq(field.parse_value(&filter.value)?),
            FilterOp::Ne => column.ne(field.parse_value(&filter.value)?),
            FilterOp::Gt => column.gt(field.parse_value(&filter.value)?),
            FilterOp::Gte => column.gte(field.parse_value(&filter.value)?),
            FilterOp::Lt => column.lt(field.parse_value(&filter.value)?),
            FilterOp::Lte => column.lte(field.parse_value(&filter.value)?),
            FilterOp::Contains if field.is_text() => Expr::col((UserEntity, column))
                .like(escaped_like(format!("%{}%", escape_like(&filter.value)))),
            FilterOp::StartsWith if field.is_text() => Expr::col((UserEntity, column))
                .like(escaped_like(format!("{}%", escape_like(&filter.value)))),
            FilterOp::Contains | FilterOp::StartsWith => return Err(unsupported()),
            FilterOp::In => {
                let values = filter
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| field.parse_value(v))
                    .collect::<Result<Vec<Value>, _>>()?;
                column.is_in(values)
            }
        };

        Ok(condition.add(expr))
    }
}
