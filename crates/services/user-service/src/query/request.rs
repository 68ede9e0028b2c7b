//! Listing request parameters.

use sea_orm::Order;

use super::field::UserField;
use super::filter::{FieldFilter, FilterCriteria};

/// Parameters a caller may send to the user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersRequest {
    /// Free-text term matched against display name and full name
    pub q: Option<String>,
    /// Raw `<column> [asc|desc]` directive
    pub order: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Every parameter not listed above
    pub filters: FilterCriteria,
}

impl ListUsersRequest {
    /// Build a request from raw query-string pairs.
    ///
    /// Malformed `limit`/`offset` values are dropped so the defaults apply.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "q" => request.q = Some(value.to_string()),
                "order" => request.order = Some(value.to_string()),
                "limit" => request.limit = parse_count("limit", value),
                "offset" => request.offset = parse_count("offset", value),
                _ => request.filters.push(FieldFilter::from_param(key, value)),
            }
        }

        request
    }

    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_window(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Trimmed search term, `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

fn parse_count(name: &str, value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(
                param = name,
                value,
                error = %e,
                "Ignoring malformed pagination parameter"
            );
            None
        }
    }
}

/// Sort direction of an order directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_order(self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// A validated ordering: allow-listed field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDirective {
    pub field: UserField,
    pub direction: SortDirection,
}

impl OrderDirective {
    /// Parse `<column>` or `<column> <asc|desc>`.
    ///
    /// Returns `None` for unknown columns, unknown directions or extra tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let field = UserField::from_name(parts.next()?)?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { field, direction })
    }
}
