//! User infrastructure module
//!
//! This module provides the credential derivers, the in-memory and PostgreSQL
//! user repositories and the registration service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{
    generate_salt, Argon2Deriver, CredentialDeriver, DeriverAlgorithm, HmacSha512Deriver,
    SALT_LENGTH,
};
pub use postgres_repository::{PostgresUserRepository, EMAIL_CONSTRAINT, LOGIN_CONSTRAINT};
pub use repository::InMemoryUserRepository;
pub use service::{RegistrationService, RegistrationServiceTrait};

#[cfg(test)]
pub use service::MockRegistrationServiceTrait;
