//! In-memory user repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{UserFilter, UserRecord, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Records are kept in insertion order. Email and login uniqueness is checked
/// and the record appended under a single write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial records
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Snapshot of every stored record
    pub async fn all(&self) -> Vec<UserRecord> {
        self.users.read().await.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find(&self, filter: &UserFilter, limit: usize) -> Result<Vec<UserRecord>, DomainError> {
        let users = self.users.read().await;

        Ok(users
            .iter()
            .filter(|user| filter.matches(user))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_one(&self, record: UserRecord) -> Result<UserRecord, DomainError> {
        let mut users = self.users.write().await;

        let email_taken = users.iter().any(|u| u.email() == record.email());
        let login_taken = users.iter().any(|u| u.login() == record.login());

        if email_taken || login_taken {
            return Err(DomainError::duplicate_identity(email_taken, login_taken));
        }

        if users.iter().any(|u| u.id() == record.id()) {
            return Err(DomainError::storage(format!(
                "User with ID '{}' already exists",
                record.id()
            )));
        }

        users.push(record.clone());

        Ok(record)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().await.len())
    }
}
