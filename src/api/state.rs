//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::UserRepository;
use crate::infrastructure::user::RegistrationServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<dyn RegistrationServiceTrait>,
    /// Probed by the readiness check
    pub user_repository: Arc<dyn UserRepository>,
    /// Answer every registration with HTTP 200, carrying the outcome in the envelope
    pub always_ok_status: bool,
}

impl AppState {
    pub fn new(
        registration_service: Arc<dyn RegistrationServiceTrait>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            registration_service,
            user_repository,
            always_ok_status: true,
        }
    }

    pub fn with_always_ok_status(mut self, always_ok_status: bool) -> Self {
        self.always_ok_status = always_ok_status;
        self
    }
}
