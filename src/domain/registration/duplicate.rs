//! Duplicate identity check

use tracing::warn;

use super::error::{RegistrationError, StoreOperation};
use crate::domain::user::{UserFilter, UserRepository};

/// At most one record can hold the email and one the login
pub const DUPLICATE_LOOKUP_LIMIT: usize = 2;

/// Fail with a conflict when the email or login is already registered
///
/// Flags are computed against every returned record, so a single record can
/// raise both.
pub async fn check_duplicate<R>(
    repository: &R,
    login: &str,
    email: &str,
) -> Result<(), RegistrationError>
where
    R: UserRepository + ?Sized,
{
    let filter = UserFilter::email_or_login(email, login);

    let existing = repository
        .find(&filter, DUPLICATE_LOOKUP_LIMIT)
        .await
        .map_err(|e| {
            warn!(error = %e, "Duplicate lookup failed");
            RegistrationError::Store(StoreOperation::Lookup)
        })?;

    if existing.is_empty() {
        return Ok(());
    }

    let email_taken = existing.iter().any(|record| record.email() == email);
    let login_taken = existing.iter().any(|record| record.login() == login);

    Err(RegistrationError::conflict(email_taken, login_taken))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::DuplicateFlags;
    use crate::domain::user::{MockUserRepository, PasswordCredential, UserIdentity, UserRecord};
    use crate::domain::DomainError;

    fn record(login: &str, email: &str) -> UserRecord {
        UserRecord::register(
            UserIdentity::normalized("Jane", "Doe", login, email),
            PasswordCredential::new("hash", "salt"),
        )
    }

    fn repository_returning(records: Vec<UserRecord>) -> MockUserRepository {
        let mut mock = MockUserRepository::new();
        mock.expect_find()
            .withf(|filter, limit| {
                *limit == DUPLICATE_LOOKUP_LIMIT
                    && *filter == UserFilter::email_or_login("a@x.com", "newlogin1")
            })
            .returning(move |_, _| Ok(records.clone()));
        mock
    }

    #[tokio::test]
    async fn test_no_match_passes() {
        let repository = repository_returning(vec![]);

        assert!(check_duplicate(&repository, "newlogin1", "a@x.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_same_email_different_login() {
        let repository = repository_returning(vec![record("otherlogin", "a@x.com")]);

        let error = check_duplicate(&repository, "newlogin1", "a@x.com")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            RegistrationError::Conflict(DuplicateFlags {
                email: true,
                login: false
            })
        );
        assert_eq!(error.status(), 409);
    }

    #[tokio::test]
    async fn test_single_record_can_raise_both_flags() {
        let repository = repository_returning(vec![record("newlogin1", "a@x.com")]);

        let error = check_duplicate(&repository, "newlogin1", "a@x.com")
            .await
            .unwrap_err();

        assert_eq!(error, RegistrationError::conflict(true, true));
    }

    #[tokio::test]
    async fn test_two_records_each_raise_one_flag() {
        let repository = repository_returning(vec![
            record("otherlogin", "a@x.com"),
            record("newlogin1", "b@x.com"),
        ]);

        let error = check_duplicate(&repository, "newlogin1", "a@x.com")
            .await
            .unwrap_err();

        assert_eq!(error, RegistrationError::conflict(true, true));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_store_error() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find()
            .returning(|_, _| Err(DomainError::storage("connection reset")));

        let error = check_duplicate(&repository, "newlogin1", "a@x.com")
            .await
            .unwrap_err();

        assert_eq!(error, RegistrationError::Store(StoreOperation::Lookup));
        assert_eq!(error.message(), "Unable to check database");
    }

    #[tokio::test]
    async fn test_check_is_idempotent() {
        let repository = repository_returning(vec![record("otherlogin", "a@x.com")]);

        let first = check_duplicate(&repository, "newlogin1", "a@x.com").await;
        let second = check_duplicate(&repository, "newlogin1", "a@x.com").await;

        assert_eq!(first, second);
    }
}
