//! User repository trait (persistence gateway)

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::UserRecord;
use super::filter::UserFilter;
use crate::domain::DomainError;

/// Repository trait for the `users` collection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find records matching the filter, in storage order, returning at most `limit` records
    async fn find(&self, filter: &UserFilter, limit: usize) -> Result<Vec<UserRecord>, DomainError>;

    /// Insert a new record
    ///
    /// Implementations reject a record whose email or login is already stored with
    /// `DomainError::DuplicateIdentity`.
    async fn insert_one(&self, record: UserRecord) -> Result<UserRecord, DomainError>;

    /// Count stored records
    async fn count(&self) -> Result<usize, DomainError>;
}
