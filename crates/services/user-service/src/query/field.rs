//! Allow-listed user fields that requests may filter and order by.

use chrono::{DateTime, Utc};
use sea_orm::Value;

use super::filter::FilterError;
use crate::repository::entities::user::Column;

/// A user attribute exposed to request-driven queries.
///
/// Every field maps to exactly one column; anything not listed here cannot
/// reach the generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    Username,
    Email,
    DisplayName,
    FullName,
    Gender,
    Active,
    Blocked,
    Language,
    AcceptTerms,
    Birthdate,
    Phone,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Integer,
    Bool,
    Timestamp,
    Text,
}

impl UserField {
    pub const ALL: [UserField; 14] = [
        UserField::Id,
        UserField::Username,
        UserField::Email,
        UserField::DisplayName,
        UserField::FullName,
        UserField::Gender,
        UserField::Active,
        UserField::Blocked,
        UserField::Language,
        UserField::AcceptTerms,
        UserField::Birthdate,
        UserField::Phone,
        UserField::CreatedAt,
        UserField::UpdatedAt,
    ];

    /// Public (camelCase) name, as it appears in JSON records
    pub fn name(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Username => "username",
            UserField::Email => "email",
            UserField::DisplayName => "displayName",
            UserField::FullName => "fullName",
            UserField::Gender => "gender",
            UserField::Active => "active",
            UserField::Blocked => "blocked",
            UserField::Language => "language",
            UserField::AcceptTerms => "acceptTerms",
            UserField::Birthdate => "birthdate",
            UserField::Phone => "phone",
            UserField::CreatedAt => "createdAt",
            UserField::UpdatedAt => "updatedAt",
        }
    }

    /// Resolve a public name or its snake_case column alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name || f.column_name() == name)
    }

    pub fn column(self) -> Column {
        match self {
            UserField::Id => Column::Id,
            UserField::Username => Column::Username,
            UserField::Email => Column::Email,
            UserField::DisplayName => Column::DisplayName,
            UserField::FullName => Column::FullName,
            UserField::Gender => Column::Gender,
            UserField::Active => Column::Active,
            UserField::Blocked => Column::Blocked,
            UserField::Language => Column::Language,
            UserField::AcceptTerms => Column::AcceptTerms,
            UserField::Birthdate => Column::Birthdate,
            UserField::Phone => Column::Phone,
            UserField::CreatedAt => Column::CreatedAt,
            UserField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn column_name(self) -> &'static str {
        match self {
            UserField::DisplayName => "display_name",
            UserField::FullName => "full_name",
            UserField::AcceptTerms => "accept_terms",
            UserField::CreatedAt => "created_at",
            UserField::UpdatedAt => "updated_at",
            other => other.name(),
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            UserField::Id => FieldKind::Integer,
            UserField::Active | UserField::Blocked | UserField::AcceptTerms => FieldKind::Bool,
            UserField::CreatedAt | UserField::UpdatedAt => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }

    /// Whether substring/prefix matching makes sense for this field
    pub fn is_text(self) -> bool {
        self.kind() == FieldKind::Text
    }

    /// Convert a raw request value into a typed column value.
    pub fn parse_value(self, raw: &str) -> Result<Value, FilterError> {
        let invalid = |reason: String| FilterError::InvalidValue {
            field: self.name().to_string(),
            value: raw.to_string(),
            reason,
        };

        match self.kind() {
            FieldKind::Integer => {
                let id = raw.trim().parse::<u64>().map_err(|e| invalid(e.to_string()))?;
                let id = i64::try_from(id).map_err(|e| invalid(e.to_string()))?;
                Ok(id.into())
            }
            FieldKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true.into()),
                "false" | "0" => Ok(false.into()),
                _ => Err(invalid("expected true or false".to_string())),
            },
            FieldKind::Timestamp => {
                let ts = DateTime::parse_from_rfc3339(raw.trim())
                    .map_err(|e| invalid(e.to_string()))?
                    .with_timezone(&Utc);
                Ok(ts.into())
            }
            FieldKind::Text => Ok(raw.to_string().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_accepts_both_spellings() {
        assert_eq!(UserField::from_name("displayName"), Some(UserField::DisplayName));
        assert_eq!(UserField::from_name("display_name"), Some(UserField::DisplayName));
        assert_eq!(UserField::from_name("createdAt"), Some(UserField::CreatedAt));
        assert_eq!(UserField::from_name("id"), Some(UserField::Id));
    }

    #[test]
    fn test_from_name_rejects_unlisted_columns() {
        assert_eq!(UserField::from_name("roles"), None);
        assert_eq!(UserField::from_name("biography"), None);
        assert_eq!(UserField::from_name("id; DROP TABLE users"), None);
    }

    #[test]
    fn test_parse_value_by_kind() {
        assert_eq!(UserField::Id.parse_value("12").unwrap(), Value::from(12i64));
        assert_eq!(UserField::Active.parse_value("TRUE").unwrap(), Value::from(true));
        assert_eq!(
            UserField::Username.parse_value("bob").unwrap(),
            Value::from("bob".to_string())
        );
        assert!(UserField::CreatedAt
            .parse_value("2024-03-01T10:00:00Z")
            .is_ok());
    }

    #[test]
    fn test_parse_value_rejects_malformed_input() {
        assert!(UserField::Id.parse_value("-4").is_err());
        assert!(UserField::Blocked.parse_value("maybe").is_err());
        assert!(UserField::UpdatedAt.parse_value("yesterday").is_err());
    }
}
