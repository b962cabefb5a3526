//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::user::{
    FilterConnector, PasswordCredential, UserFilter, UserId, UserIdentity, UserProfile,
    UserRecord, UserRepository,
};
use crate::domain::DomainError;

/// Unique constraint on `users.email`
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Unique constraint on `users.login`
pub const LOGIN_CONSTRAINT: &str = "users_login_key";

const SELECT_COLUMNS: &str = "id, name, surname, login, email, password, password_salt, \
     age, sex, orientation, geolocation, tags, winks, winked_by, profile_picture, pictures, \
     created_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find(&self, filter: &UserFilter, limit: usize) -> Result<Vec<UserRecord>, DomainError> {
        let mut params = Vec::new();
        let clause = filter_to_sql(filter, &mut params);
        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY seq LIMIT ${}",
            SELECT_COLUMNS,
            clause,
            params.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param);
        }

        let rows = query
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn insert_one(&self, record: UserRecord) -> Result<UserRecord, DomainError> {
        let profile = record.profile();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, surname, login, email, password, password_salt,
                               age, sex, orientation, geolocation, tags, winks, winked_by,
                               profile_picture, pictures, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.name())
        .bind(record.surname())
        .bind(record.login())
        .bind(record.email())
        .bind(&record.credential().hash)
        .bind(&record.credential().salt)
        .bind(profile.age)
        .bind(&profile.sex)
        .bind(&profile.orientation)
        .bind(&profile.geolocation)
        .bind(Json(&profile.tags))
        .bind(Json(&profile.winks))
        .bind(Json(&profile.winked_by))
        .bind(profile.profile_picture)
        .bind(Json(&profile.pictures))
        .bind(record.created_at())
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(record)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// Render a filter as a SQL boolean expression, pushing bound values to `params`
fn filter_to_sql(filter: &UserFilter, params: &mut Vec<String>) -> String {
    match filter {
        UserFilter::Equals { field, value } => {
            params.push(value.clone());
            format!("{} = ${}", field.column(), params.len())
        }
        UserFilter::Group { connector, filters } => {
            if filters.is_empty() {
                return match connector {
                    FilterConnector::And => "TRUE".to_string(),
                    FilterConnector::Or => "FALSE".to_string(),
                };
            }

            let separator = match connector {
                FilterConnector::And => " AND ",
                FilterConnector::Or => " OR ",
            };

            let parts: Vec<String> = filters
                .iter()
                .map(|f| filter_to_sql(f, params))
                .collect();

            format!("({})", parts.join(separator))
        }
    }
}

fn map_insert_error(error: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            if let Some(flags) = duplicate_flags(db_error.constraint()) {
                return DomainError::duplicate_identity(flags.0, flags.1);
            }
        }
    }

    DomainError::storage(format!("Failed to insert user: {}", error))
}

/// `(email, login)` flags for a violated unique constraint
fn duplicate_flags(constraint: Option<&str>) -> Option<(bool, bool)> {
    match constraint? {
        EMAIL_CONSTRAINT => Some((true, false)),
        LOGIN_CONSTRAINT => Some((false, true)),
        _ => None,
    }
}

/// `LIMIT` parameter, saturating at `i64::MAX`
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn row_to_user(row: &PgRow) -> Result<UserRecord, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::storage(format!("Invalid user row in database: {}", e));

    let identity = UserIdentity {
        name: row.try_get("name").map_err(column_error)?,
        surname: row.try_get("surname").map_err(column_error)?,
        login: row.try_get("login").map_err(column_error)?,
        email: row.try_get("email").map_err(column_error)?,
    };

    let credential = PasswordCredential::new(
        row.try_get::<String, _>("password").map_err(column_error)?,
        row.try_get::<String, _>("password_salt").map_err(column_error)?,
    );

    let profile = UserProfile {
        age: row.try_get("age").map_err(column_error)?,
        sex: row.try_get("sex").map_err(column_error)?,
        orientation: row.try_get("orientation").map_err(column_error)?,
        geolocation: row.try_get("geolocation").map_err(column_error)?,
        tags: row
            .try_get::<Json<Vec<String>>, _>("tags")
            .map_err(column_error)?
            .0,
        winks: row
            .try_get::<Json<Vec<String>>, _>("winks")
            .map_err(column_error)?
            .0,
        winked_by: row
            .try_get::<Json<Vec<String>>, _>("winked_by")
            .map_err(column_error)?
            .0,
        profile_picture: row.try_get("profile_picture").map_err(column_error)?,
        pictures: row
            .try_get::<Json<Vec<String>>, _>("pictures")
            .map_err(column_error)?
            .0,
    };

    Ok(UserRecord::restore(
        UserId::from_uuid(row.try_get("id").map_err(column_error)?),
        identity,
        credential,
        profile,
        row.try_get("created_at").map_err(column_error)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserField;

    #[test]
    fn test_email_or_login_sql() {
        let mut params = Vec::new();
        let sql = filter_to_sql(&UserFilter::email_or_login("a@x.com", "jdoe1234"), &mut params);

        assert_eq!(sql, "(email = $1 OR login = $2)");
        assert_eq!(params, vec!["a@x.com".to_string(), "jdoe1234".to_string()]);
    }

    #[test]
    fn test_nested_group_sql() {
        let filter = UserFilter::all_of(vec![
            UserFilter::equals(UserField::Login, "jdoe1234"),
            UserFilter::any_of(vec![
                UserFilter::equals(UserField::Email, "a@x.com"),
                UserFilter::equals(UserField::Email, "b@x.com"),
            ]),
        ]);

        let mut params = Vec::new();
        let sql = filter_to_sql(&filter, &mut params);

        assert_eq!(sql, "(login = $1 AND (email = $2 OR email = $3))");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_empty_group_sql() {
        let mut params = Vec::new();

        assert_eq!(filter_to_sql(&UserFilter::any_of(vec![]), &mut params), "FALSE");
        assert_eq!(filter_to_sql(&UserFilter::all_of(vec![]), &mut params), "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_duplicate_flags_from_constraint() {
        assert_eq!(duplicate_flags(Some(EMAIL_CONSTRAINT)), Some((true, false)));
        assert_eq!(duplicate_flags(Some(LOGIN_CONSTRAINT)), Some((false, true)));
        assert_eq!(duplicate_flags(Some("users_pkey")), None);
        assert_eq!(duplicate_flags(None), None);
    }

    #[test]
    fn test_non_database_error_maps_to_storage() {
        let error = map_insert_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, DomainError::Storage { .. }));
    }

    #[test]
    fn test_sql_limit_saturates() {
        assert_eq!(sql_limit(2), 2);
        assert_eq!(sql_limit(usize::MAX), i64::MAX);
    }
}
