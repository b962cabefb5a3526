//! User domain
//!
//! This module provides the persisted user record, the filter language used to
//! query the user collection and the repository trait implemented by storage
//! backends.

mod entity;
mod filter;
mod repository;

pub use entity::{
    PasswordCredential, UserId, UserIdentity, UserProfile, UserRecord, DEFAULT_AGE,
    NO_PROFILE_PICTURE,
};
pub use filter::{FilterConnector, UserField, UserFilter};
pub use repository::UserRepository;

#[cfg(test)]
pub use repository::MockUserRepository;
