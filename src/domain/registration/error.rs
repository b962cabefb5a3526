use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::{FieldFlags, ValidationFailure};

pub const VALIDATION_STATUS: u16 = 422;
pub const CONFLICT_STATUS: u16 = 409;
pub const STORE_STATUS: u16 = 400;

/// Store operation that failed during a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Lookup,
    Insert,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::Lookup => "Unable to check database",
            Self::Insert => "Unable to insert to database on registration",
        };
        write!(f, "{}", message)
    }
}

/// Which identifiers are already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateFlags {
    pub email: bool,
    pub login: bool,
}

impl DuplicateFlags {
    pub fn any(&self) -> bool {
        self.email || self.login
    }
}

/// Reasons a registration is rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Incorrect values")]
    Validation(ValidationFailure),

    #[error("Email/login already used")]
    Conflict(DuplicateFlags),

    #[error("{0}")]
    Store(StoreOperation),
}

impl RegistrationError {
    pub fn conflict(email: bool, login: bool) -> Self {
        Self::Conflict(DuplicateFlags { email, login })
    }

    /// Status code embedded in the envelope
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => VALIDATION_STATUS,
            Self::Conflict(_) => CONFLICT_STATUS,
            Self::Store(_) => STORE_STATUS,
        }
    }

    /// Human-readable message embedded in the envelope
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Label used for metrics and logs
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store",
        }
    }

    pub fn invalid_fields(&self) -> Option<&FieldFlags> {
        match self {
            Self::Validation(failure) => Some(failure.fields()),
            _ => None,
        }
    }
}

impl From<ValidationFailure> for RegistrationError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}
