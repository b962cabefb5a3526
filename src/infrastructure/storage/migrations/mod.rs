//! Versioned schema migrations for the `users` table

use sqlx::postgres::PgPool;
use tracing::{debug, info};

use crate::domain::DomainError;

/// One schema step, applied at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    /// May hold several statements
    pub up: &'static str,
}

/// Schema of the user store, in application order
pub const STORAGE_MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Create users table",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                seq BIGSERIAL,
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                surname TEXT NOT NULL,
                login TEXT NOT NULL,
                email TEXT NOT NULL,
                password TEXT NOT NULL,
                password_salt TEXT NOT NULL,
                age INTEGER NOT NULL DEFAULT 18,
                sex TEXT NOT NULL DEFAULT '',
                orientation TEXT NOT NULL DEFAULT '',
                geolocation TEXT NOT NULL DEFAULT '',
                tags JSONB NOT NULL DEFAULT '[]',
                winks JSONB NOT NULL DEFAULT '[]',
                winked_by JSONB NOT NULL DEFAULT '[]',
                profile_picture INTEGER NOT NULL DEFAULT -1,
                pictures JSONB NOT NULL DEFAULT '[]',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_users_seq ON users(seq);
        "#,
    },
    Migration {
        version: 2,
        description: "Enforce unique email and login",
        up: r#"
            ALTER TABLE users ADD CONSTRAINT users_email_key UNIQUE (email);
            ALTER TABLE users ADD CONSTRAINT users_login_key UNIQUE (login);
        "#,
    },
];

/// Tracks applied versions in `_migrations`
#[derive(Debug, Clone)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Apply `migration` unless already recorded
    ///
    /// The schema change and its `_migrations` row commit together, so a
    /// failed step leaves no trace and is retried on the next run.
    pub async fn apply(&self, migration: &Migration) -> Result<bool, DomainError> {
        let failed = |stage: &str, e: sqlx::Error| {
            DomainError::storage(format!(
                "Migration {} failed to {}: {}",
                migration.version, stage, e
            ))
        };

        let mut tx = self.pool.begin().await.map_err(|e| failed("begin", e))?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| failed("check status", e))?;

        if applied {
            debug!(version = migration.version, "Migration already applied");
            return Ok(false);
        }

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| failed("run", e))?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| failed("record", e))?;

        tx.commit().await.map_err(|e| failed("commit", e))?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Apply every pending migration in order, returning how many ran
    pub async fn apply_all(&self, migrations: &[Migration]) -> Result<usize, DomainError> {
        self.ensure_migrations_table().await?;

        let mut applied = 0;
        for migration in migrations {
            if self.apply(migration).await? {
                applied += 1;
            }
        }

        Ok(applied)
    }

    /// Highest applied version, `None` on a fresh database
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read schema version: {}", e)))
    }
}

/// Bring the user store schema up to date
pub async fn run_storage_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::new(pool.clone())
        .apply_all(STORAGE_MIGRATIONS)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::{EMAIL_CONSTRAINT, LOGIN_CONSTRAINT};

    #[test]
    fn test_versions_strictly_ascending() {
        for pair in STORAGE_MIGRATIONS.windows(2) {
            assert!(pair[1].version > pair[0].version);
        }
        assert_eq!(STORAGE_MIGRATIONS[0].version, 1);
    }

    #[test]
    fn test_unique_constraints_match_repository() {
        let sql: String = STORAGE_MIGRATIONS.iter().map(|m| m.up).collect();

        assert!(sql.contains(EMAIL_CONSTRAINT));
        assert!(sql.contains(LOGIN_CONSTRAINT));
    }

    #[test]
    fn test_users_table_has_profile_defaults() {
        let create = STORAGE_MIGRATIONS[0].up;

        assert!(create.contains("age INTEGER NOT NULL DEFAULT 18"));
        assert!(create.contains("profile_picture INTEGER NOT NULL DEFAULT -1"));
        assert!(create.contains("seq BIGSERIAL"));
    }
}
