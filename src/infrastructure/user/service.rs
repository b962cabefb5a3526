//! Registration service: validate, check duplicates, derive credentials, persist

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::domain::registration::{
    check_duplicate, validate_registration, RegistrationError, RegistrationRequest, StoreOperation,
};
use crate::domain::user::{UserIdentity, UserRecord, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_registration;

use super::password::CredentialDeriver;

/// Trait for registration operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistrationServiceTrait: Send + Sync {
    /// Run the registration pipeline for one request
    async fn register(&self, request: RegistrationRequest) -> Result<UserRecord, RegistrationError>;
}

/// Registration pipeline over a user repository and a credential deriver
#[derive(Debug)]
pub struct RegistrationService<R: ?Sized, D: ?Sized> {
    repository: Arc<R>,
    deriver: Arc<D>,
}

impl<R, D> RegistrationService<R, D>
where
    R: UserRepository + ?Sized,
    D: CredentialDeriver + ?Sized,
{
    /// Create a new registration service
    pub fn new(repository: Arc<R>, deriver: Arc<D>) -> Self {
        Self {
            repository,
            deriver,
        }
    }

    async fn run(&self, request: &RegistrationRequest) -> Result<UserRecord, RegistrationError> {
        validate_registration(request)?;
        debug!(login = %request.login, "Registration fields valid");

        check_duplicate(self.repository.as_ref(), &request.login, &request.email).await?;
        debug!(login = %request.login, "No existing account for email or login");

        let credential = self.deriver.derive(&request.password);
        let identity = UserIdentity::normalized(
            &request.name,
            &request.surname,
            &request.login,
            &request.email,
        );
        let record = UserRecord::register(identity, credential);

        self.repository
            .insert_one(record)
            .await
            .map_err(|e| match e {
                DomainError::DuplicateIdentity { email, login } => {
                    RegistrationError::conflict(email, login)
                }
                other => {
                    error!(error = %other, "Failed to insert registered user");
                    RegistrationError::Store(StoreOperation::Insert)
                }
            })
    }
}

#[async_trait]
impl<R, D> RegistrationServiceTrait for RegistrationService<R, D>
where
    R: UserRepository + ?Sized + 'static,
    D: CredentialDeriver + ?Sized + 'static,
{
    async fn register(&self, request: RegistrationRequest) -> Result<UserRecord, RegistrationError> {
        let started = Instant::now();
        let result = self.run(&request).await;

        match &result {
            Ok(record) => {
                info!(user_id = %record.id(), login = %record.login(), "User registered");
                record_registration("success", started.elapsed());
            }
            Err(e) => {
                warn!(
                    login = %request.login,
                    outcome = e.outcome(),
                    status = e.status(),
                    "Registration rejected: {}",
                    e
                );
                record_registration(e.outcome(), started.elapsed());
            }
        }

        result
    }
}
