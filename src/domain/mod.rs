//! Domain layer - Core business logic and entities

pub mod error;
pub mod registration;
pub mod user;

pub use error::DomainError;
pub use registration::{
    check_duplicate, validate_registration, RegistrationEnvelope, RegistrationError,
    RegistrationRequest,
};
pub use user::{UserFilter, UserRecord, UserRepository};
