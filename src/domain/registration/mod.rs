//! Registration domain
//!
//! Validation rules, the duplicate identity check, the error taxonomy and the
//! response envelope shared by every outcome.

mod duplicate;
mod envelope;
mod error;
mod request;
mod validation;

pub use duplicate::{check_duplicate, DUPLICATE_LOOKUP_LIMIT};
pub use envelope::{ErrorPayload, RegistrationEnvelope, SUCCESS_MESSAGE};
pub use error::{
    DuplicateFlags, RegistrationError, StoreOperation, CONFLICT_STATUS, STORE_STATUS,
    VALIDATION_STATUS,
};
pub use request::RegistrationRequest;
pub use validation::{
    check_confirmation, check_email, check_login, check_name, check_password,
    validate_registration, FieldFlags, RegistrationField, ValidationFailure, Violation,
    MAX_LOGIN_LENGTH, MIN_LOGIN_LENGTH, MIN_PASSWORD_LENGTH,
};
