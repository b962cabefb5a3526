//! Predicates over the user collection

use serde::{Deserialize, Serialize};

use super::entity::UserRecord;

/// Fields that can be used in a user filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Email,
    Login,
}

impl UserField {
    /// Column name used by relational storage
    pub fn column(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Login => "login",
        }
    }

    fn value_of<'a>(&self, record: &'a UserRecord) -> &'a str {
        match self {
            Self::Email => record.email(),
            Self::Login => record.login(),
        }
    }
}

/// Logical connectors for combining filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterConnector {
    #[default]
    And,
    Or,
}

/// Filter over user records: equality conditions combined with AND/OR groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserFilter {
    /// `field == value`
    Equals { field: UserField, value: String },
    /// Nested filters joined by a connector
    Group {
        connector: FilterConnector,
        filters: Vec<UserFilter>,
    },
}

impl UserFilter {
    pub fn equals(field: UserField, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn any_of(filters: Vec<UserFilter>) -> Self {
        Self::Group {
            connector: FilterConnector::Or,
            filters,
        }
    }

    pub fn all_of(filters: Vec<UserFilter>) -> Self {
        Self::Group {
            connector: FilterConnector::And,
            filters,
        }
    }

    /// Records whose email equals `email` OR whose login equals `login`
    pub fn email_or_login(email: impl Into<String>, login: impl Into<String>) -> Self {
        Self::any_of(vec![
            Self::equals(UserField::Email, email),
            Self::equals(UserField::Login, login),
        ])
    }

    /// Evaluate the filter against a record
    ///
    /// An empty OR group matches nothing, an empty AND group matches everything.
    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            Self::Equals { field, value } => field.value_of(record) == value,
            Self::Group { connector, filters } => match connector {
                FilterConnector::And => filters.iter().all(|f| f.matches(record)),
                FilterConnector::Or => filters.iter().any(|f| f.matches(record)),
            },
        }
    }
}
